/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Canonical Textual Form
 * ----------------------
 * Converts runtime values into the canonical text used by `string()` and
 * `print`. Any JSON-equivalent value renders as a JSON-compatible string:
 * strings are quoted (with escapes) inside containers but bare at the top
 * level, blocks render in insertion order, floats use the shortest
 * round-trip decimal.
 *
 * --------------------------------------------------------------------------
 * Author:   Sam Wilcox
 * Email:    sam@fang-lang.com
 * Website:  https://www.fang-lang.com
 * Github:   https://github.com/samwilcox/fang
 *
 * License:
 * This file is part of the FANG scripting language project.
 *
 * FANG is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 * Full license text available at:
 *    https://license.fang-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use crate::config::Config;
use crate::error::FangError;
use crate::value::Value;

/// Canonical text of a value. Non-finite floats render through the
/// configured `infinity`/`nan` strings and are an error without them.
pub fn string_of(value: &Value, config: &Config) -> Result<String, FangError> {
    render(value, config, false)
}

fn render(value: &Value, config: &Config, quoted: bool) -> Result<String, FangError> {
    match value {
        Value::Null | Value::Undefined => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) => float_text(*f, config),

        Value::String(s) => {
            if quoted {
                Ok(quote(s))
            } else {
                Ok(s.clone())
            }
        }

        Value::Array(values) => {
            let mut out = String::from("[");
            for (i, element) in values.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&render(element, config, true)?);
            }
            out.push(']');
            Ok(out)
        }

        Value::Block(entries) => {
            let mut out = String::from("{");
            for (i, (key, element)) in entries.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&quote(key));
                out.push_str(": ");
                out.push_str(&render(element, config, true)?);
            }
            out.push('}');
            Ok(out)
        }

        Value::Function(func) => {
            if func.callee.name.is_empty() {
                Ok("[function]".to_string())
            } else {
                Ok(format!("[function {}]", func.callee.name))
            }
        }

        Value::Expr(_) => Ok("[expression]".to_string()),
    }
}

/// Shortest round-trip decimal for finite floats; the configured
/// stand-ins for NaN and ±Infinity.
pub(crate) fn float_text(value: f64, config: &Config) -> Result<String, FangError> {
    if value.is_nan() {
        return match &config.nan {
            Some(text) => Ok(text.clone()),
            None => Err(FangError::eval_error("NaN has no textual form", None)
                .with_help("set the 'nan' option to choose one")),
        };
    }

    if value.is_infinite() {
        return match &config.infinity {
            Some(text) if value < 0.0 => Ok(format!("-{}", text)),
            Some(text) => Ok(text.clone()),
            None => Err(FangError::eval_error("Infinity has no textual form", None)
                .with_help("set the 'infinity' option to choose one")),
        };
    }

    Ok(format!("{:?}", value))
}

/// Double-quotes a string with the JSON escape set.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &Value) -> String {
        string_of(value, &Config::default()).expect("render failure")
    }

    #[test]
    fn scalars() {
        assert_eq!(text(&Value::Null), "null");
        assert_eq!(text(&Value::Bool(true)), "true");
        assert_eq!(text(&Value::Int(-3)), "-3");
        assert_eq!(text(&Value::Float(1.5)), "1.5");
        assert_eq!(text(&Value::Float(1.0)), "1.0");
        assert_eq!(text(&Value::from("plain")), "plain");
    }

    #[test]
    fn strings_are_quoted_only_inside_containers() {
        let value = Value::array(vec![Value::from("a\"b\n")]);
        assert_eq!(text(&value), r#"["a\"b\n"]"#);
    }

    #[test]
    fn blocks_render_in_insertion_order() {
        let value = Value::block(
            [
                ("z".to_string(), Value::Int(1)),
                ("a".to_string(), Value::array(vec![Value::Int(2), Value::Int(1)])),
            ]
            .into_iter()
            .collect(),
        );
        assert_eq!(text(&value), r#"{"z": 1, "a": [2, 1]}"#);
    }

    #[test]
    fn rendered_json_reparses() {
        let value = Value::block(
            [
                ("a".to_string(), Value::Int(3)),
                ("b".to_string(), Value::array(vec![Value::from("x"), Value::Null])),
            ]
            .into_iter()
            .collect(),
        );
        let parsed: Value = serde_json::from_str(&text(&value)).expect("invalid JSON produced");
        assert!(parsed.equals(&value));
    }

    #[test]
    fn non_finite_floats_require_configuration() {
        assert!(string_of(&Value::Float(f64::INFINITY), &Config::default()).is_err());

        let config = Config::default().with_infinity("Infinity").with_nan("NaN");
        assert_eq!(
            string_of(&Value::Float(f64::INFINITY), &config).unwrap(),
            "Infinity"
        );
        assert_eq!(
            string_of(&Value::Float(f64::NEG_INFINITY), &config).unwrap(),
            "-Infinity"
        );
        assert_eq!(string_of(&Value::Float(f64::NAN), &config).unwrap(), "NaN");
    }
}
