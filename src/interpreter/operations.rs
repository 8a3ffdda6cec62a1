/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Binary Operator Tables
 * ----------------------
 * The complete two-operand dispatch for `+ - * / %`, the comparisons,
 * equality, and `in`. Every combination not listed in an operator's match
 * is a type error; nothing falls through silently.
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

use indexmap::IndexMap;

use crate::config::Config;
use crate::error::FangError;
use crate::interpreter::display;
use crate::span::Span;
use crate::value::Value;

pub(crate) fn binary(
    op: &str,
    left: &Value,
    right: &Value,
    config: &Config,
    span: Option<Span>,
) -> Result<Value, FangError> {
    match op {
        "+" => add(left, right, config, span),
        "-" => subtract(left, right, config, span),
        "*" => multiply(left, right, config, span),
        "/" => divide(left, right, config, span),
        "%" => modulo(left, right, config, span),
        "<" | "<=" | ">" | ">=" => compare(op, left, right, span),
        "==" => Ok(Value::Bool(loose_equal(left, right))),
        "!=" => Ok(Value::Bool(!loose_equal(left, right))),
        "in" => contains(left, right, span),
        other => Err(FangError::eval_error(
            format!("unknown operator '{}'", other),
            span,
        )),
    }
}

/// Unary sign operators. These are arithmetic-only; they never fall back
/// to the binary tables.
pub(crate) fn unary(
    op: &str,
    operand: &Value,
    _config: &Config,
    span: Option<Span>,
) -> Result<Value, FangError> {
    match (op, operand) {
        ("-", Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        ("-", Value::Float(f)) => Ok(Value::Float(-f)),
        ("+", Value::Int(n)) => Ok(Value::Int(*n)),
        ("+", Value::Float(f)) => Ok(Value::Float(*f)),
        (_, other) => Err(FangError::eval_error(
            format!("unary '{}' needs a number, not {}", op, other.type_name()),
            span,
        )),
    }
}

/// Admits a float result only when it is finite, or when the matching
/// `infinity`/`nan` option permits carrying it.
pub(crate) fn guard_float(
    value: f64,
    config: &Config,
    span: Option<Span>,
) -> Result<Value, FangError> {
    if value.is_finite() {
        return Ok(Value::Float(value));
    }
    if value.is_nan() {
        if config.nan.is_some() {
            return Ok(Value::Float(value));
        }
        return Err(FangError::eval_error("the result is NaN", span)
            .with_help("set the 'nan' option to permit NaN values"));
    }
    if config.infinity.is_some() {
        return Ok(Value::Float(value));
    }
    Err(FangError::eval_error("the result is infinite", span)
        .with_help("set the 'infinity' option to permit infinite values"))
}

fn type_error(op: &str, left: &Value, right: &Value, span: Option<Span>) -> FangError {
    FangError::eval_error(
        format!(
            "cannot apply '{}' to {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ),
        span,
    )
}

fn array_limit_error(config: &Config, span: Option<Span>) -> FangError {
    FangError::eval_error(
        format!("array size reaches maximum ({})", config.max_array_size),
        span,
    )
}

// ---------------------------------------------------------------------
// +
// ---------------------------------------------------------------------

fn add(
    left: &Value,
    right: &Value,
    config: &Config,
    span: Option<Span>,
) -> Result<Value, FangError> {
    match (left, right) {
        // Null is the identity on either side.
        (Value::Null, other) | (other, Value::Null) => Ok(other.clone()),

        // An array absorbs the other operand as a single element.
        (Value::Array(values), other) => {
            let mut out = values.borrow().clone();
            out.push(other.clone());
            if out.len() > config.max_array_size {
                return Err(array_limit_error(config, span));
            }
            Ok(Value::array(out))
        }
        (other, Value::Array(values)) => {
            let mut out = vec![other.clone()];
            out.extend(values.borrow().iter().cloned());
            if out.len() > config.max_array_size {
                return Err(array_limit_error(config, span));
            }
            Ok(Value::array(out))
        }

        // Blocks merge; overlapping keys add their values.
        (Value::Block(a), Value::Block(b)) => {
            let mut out = a.borrow().clone();
            for (key, value) in b.borrow().iter() {
                let merged = match out.get(key) {
                    Some(existing) => binary("+", existing, value, config, span)?,
                    None => value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            if out.len() > config.max_array_size {
                return Err(array_limit_error(config, span));
            }
            Ok(Value::block(out))
        }
        (Value::Block(_), other) => Err(type_error("+", left, other, span)),
        (other, Value::Block(_)) => Err(type_error("+", other, right, span)),

        // A string concatenates with any scalar, on either side.
        (Value::String(text), scalar) if is_scalar(scalar) => {
            let mut out = text.clone();
            out.push_str(&scalar_text(scalar, config, span)?);
            Ok(Value::String(out))
        }
        (scalar, Value::String(text)) if is_scalar(scalar) => {
            let mut out = scalar_text(scalar, config, span)?;
            out.push_str(text);
            Ok(Value::String(out))
        }

        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
        _ => {
            if let Some((a, b)) = both_numeric(left, right) {
                return guard_float(a + b, config, span);
            }
            if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
                return Ok(Value::Bool(*a || *b));
            }
            Err(type_error("+", left, right, span))
        }
    }
}

// ---------------------------------------------------------------------
// -
// ---------------------------------------------------------------------

fn subtract(
    left: &Value,
    right: &Value,
    config: &Config,
    span: Option<Span>,
) -> Result<Value, FangError> {
    match (left, right) {
        (Value::Null, Value::Null) => Ok(Value::Null),

        // Remove every element structurally equal to the right operand
        // (when the right operand is an array, elements equal to that
        // array as a whole).
        (Value::Array(values), other) => {
            let out: Vec<Value> = values
                .borrow()
                .iter()
                .filter(|element| !element.equals(other))
                .cloned()
                .collect();
            Ok(Value::array(out))
        }

        // Per-key subtraction; keys only on the right are inserted as
        // the numeric negation of their value.
        (Value::Block(a), Value::Block(b)) => {
            let mut out = a.borrow().clone();
            for (key, value) in b.borrow().iter() {
                let reduced = match out.get(key) {
                    Some(existing) => binary("-", existing, value, config, span)?,
                    None => negate(value, span)?,
                };
                out.insert(key.clone(), reduced);
            }
            Ok(Value::block(out))
        }

        // Remove the named keys.
        (Value::Block(entries), Value::Array(keys)) => {
            let mut out = entries.borrow().clone();
            for key in keys.borrow().iter() {
                match key {
                    Value::String(name) => {
                        out.shift_remove(name);
                    }
                    other => {
                        return Err(FangError::eval_error(
                            format!("a key list may only hold strings, not {}", other.type_name()),
                            span,
                        ));
                    }
                }
            }
            Ok(Value::block(out))
        }

        // Remove one key.
        (Value::Block(entries), Value::String(key)) => {
            let mut out = entries.borrow().clone();
            out.shift_remove(key);
            Ok(Value::block(out))
        }

        // Remove every occurrence of the substring(s).
        (Value::String(text), Value::String(needle)) => {
            Ok(Value::String(text.replace(needle.as_str(), "")))
        }
        (Value::String(text), Value::Array(needles)) => {
            let mut out = text.clone();
            for needle in needles.borrow().iter() {
                match needle {
                    Value::String(s) => out = out.replace(s.as_str(), ""),
                    other => {
                        return Err(FangError::eval_error(
                            format!(
                                "a substring list may only hold strings, not {}",
                                other.type_name()
                            ),
                            span,
                        ));
                    }
                }
            }
            Ok(Value::String(out))
        }

        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
        _ => {
            if let Some((a, b)) = both_numeric(left, right) {
                return guard_float(a - b, config, span);
            }
            Err(type_error("-", left, right, span))
        }
    }
}

/// Arithmetic negation, used by `Block - Block` for right-only keys.
fn negate(value: &Value, span: Option<Span>) -> Result<Value, FangError> {
    match value {
        Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
        Value::Float(f) => Ok(Value::Float(-f)),
        other => Err(FangError::eval_error(
            format!("cannot negate {}", other.type_name()),
            span,
        )),
    }
}

// ---------------------------------------------------------------------
// *
// ---------------------------------------------------------------------

fn multiply(
    left: &Value,
    right: &Value,
    config: &Config,
    span: Option<Span>,
) -> Result<Value, FangError> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),

        (Value::Bool(_), _) | (_, Value::Bool(_)) => Err(type_error("*", left, right, span)),

        // Overlapping keys multiply; keys on only one side map to null.
        (Value::Block(a), Value::Block(b)) => {
            let a = a.borrow();
            let b = b.borrow();
            let mut out = IndexMap::new();
            for (key, value) in a.iter() {
                let product = match b.get(key) {
                    Some(other) => binary("*", value, other, config, span)?,
                    None => Value::Null,
                };
                out.insert(key.clone(), product);
            }
            for key in b.keys() {
                if !out.contains_key(key) {
                    out.insert(key.clone(), Value::Null);
                }
            }
            if out.len() > config.max_array_size {
                return Err(array_limit_error(config, span));
            }
            Ok(Value::block(out))
        }

        (Value::String(text), Value::Int(count))
        | (Value::Int(count), Value::String(text)) => {
            if *count <= 0 {
                return Ok(Value::String(String::new()));
            }
            Ok(Value::String(text.repeat(*count as usize)))
        }

        (Value::Array(values), Value::Int(count))
        | (Value::Int(count), Value::Array(values)) => {
            let values = values.borrow();
            if *count <= 0 {
                return Ok(Value::array(Vec::new()));
            }
            let total = values.len().saturating_mul(*count as usize);
            if total > config.max_array_size {
                return Err(array_limit_error(config, span));
            }
            let mut out = Vec::with_capacity(total);
            for _ in 0..*count {
                out.extend(values.iter().cloned());
            }
            Ok(Value::array(out))
        }

        // Join with the string as delimiter.
        (Value::Array(values), Value::String(separator))
        | (Value::String(separator), Value::Array(values)) => {
            let mut parts = Vec::new();
            for element in values.borrow().iter() {
                parts.push(display::string_of(element, config).map_err(|e| e.or_span(span))?);
            }
            Ok(Value::String(parts.join(separator)))
        }

        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
        _ => {
            if let Some((a, b)) = both_numeric(left, right) {
                return guard_float(a * b, config, span);
            }
            Err(type_error("*", left, right, span))
        }
    }
}

// ---------------------------------------------------------------------
// /
// ---------------------------------------------------------------------

fn divide(
    left: &Value,
    right: &Value,
    config: &Config,
    span: Option<Span>,
) -> Result<Value, FangError> {
    check_divisor(right, span)?;

    match (left, right) {
        (Value::Null, _) => Ok(Value::Null),

        // Every left key must exist on the right; right-only keys map to
        // null.
        (Value::Block(a), Value::Block(b)) => {
            let a = a.borrow();
            let b = b.borrow();
            let mut out = IndexMap::new();
            for (key, value) in a.iter() {
                let Some(divisor) = b.get(key) else {
                    return Err(FangError::eval_error(
                        format!("the divisor block is missing key '{}'", key),
                        span,
                    ));
                };
                out.insert(key.clone(), binary("/", value, divisor, config, span)?);
            }
            for key in b.keys() {
                if !out.contains_key(key) {
                    out.insert(key.clone(), Value::Null);
                }
            }
            Ok(Value::block(out))
        }

        // Split; an empty divisor splits per character.
        (Value::String(text), Value::String(separator)) => {
            let parts: Vec<Value> = if separator.is_empty() {
                text.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                text.split(separator.as_str())
                    .map(|part| Value::String(part.to_string()))
                    .collect()
            };
            if parts.len() > config.max_array_size {
                return Err(array_limit_error(config, span));
            }
            Ok(Value::array(parts))
        }

        (Value::Int(a), Value::Int(b)) => {
            if let (Some(quotient), Some(0)) = (a.checked_div(*b), a.checked_rem(*b)) {
                return Ok(Value::Int(quotient));
            }
            integral_to_int(*a as f64 / *b as f64, config, span)
        }
        _ => {
            if let Some((a, b)) = both_numeric(left, right) {
                return integral_to_int(a / b, config, span);
            }
            Err(type_error("/", left, right, span))
        }
    }
}

// ---------------------------------------------------------------------
// %
// ---------------------------------------------------------------------

/// Remainder with sign-of-divisor semantics: the result lies in `[0, r)`
/// for a positive divisor and `(r, 0]` for a negative one. Defined for
/// numbers and null only.
fn modulo(
    left: &Value,
    right: &Value,
    config: &Config,
    span: Option<Span>,
) -> Result<Value, FangError> {
    check_divisor(right, span)?;

    match (left, right) {
        (Value::Null, _) => Ok(Value::Null),

        (Value::Int(a), Value::Int(b)) => match a.checked_rem(*b) {
            Some(mut remainder) => {
                if remainder != 0 && (remainder < 0) != (*b < 0) {
                    remainder += b;
                }
                Ok(Value::Int(remainder))
            }
            None => integral_to_int(euclid_mod(*a as f64, *b as f64), config, span),
        },
        _ => {
            if let Some((a, b)) = both_numeric(left, right) {
                return integral_to_int(euclid_mod(a, b), config, span);
            }
            Err(type_error("%", left, right, span))
        }
    }
}

fn euclid_mod(a: f64, b: f64) -> f64 {
    let remainder = a % b;
    if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) {
        remainder + b
    } else {
        remainder
    }
}

/// Shared divisor restrictions of `/` and `%`.
fn check_divisor(right: &Value, span: Option<Span>) -> Result<(), FangError> {
    match right {
        Value::Null => Err(FangError::eval_error("cannot divide by null", span)),
        Value::Int(0) => Err(FangError::eval_error("cannot divide by zero", span)),
        Value::Float(f) if *f == 0.0 => {
            Err(FangError::eval_error("cannot divide by zero", span))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------
// Comparisons, equality, membership
// ---------------------------------------------------------------------

fn compare(op: &str, left: &Value, right: &Value, span: Option<Span>) -> Result<Value, FangError> {
    // Exact comparison for two ints, float comparison otherwise.
    if let (Value::Int(a), Value::Int(b)) = (left, right) {
        return Ok(Value::Bool(match op {
            "<" => a < b,
            "<=" => a <= b,
            ">" => a > b,
            _ => a >= b,
        }));
    }

    let Some((a, b)) = both_numeric(left, right) else {
        return Err(type_error(op, left, right, span));
    };
    Ok(Value::Bool(match op {
        "<" => a < b,
        "<=" => a <= b,
        ">" => a > b,
        _ => a >= b,
    }))
}

/// `==`: structural, except that a boolean against a non-boolean
/// compares truthiness. The coercion applies only at the top level;
/// nested equality (inside [`Value::equals`]) is always strict.
fn loose_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Bool(_), Value::Bool(_)) => left.equals(right),
        (Value::Bool(b), other) | (other, Value::Bool(b)) => *b == other.is_truthy(),
        _ => left.equals(right),
    }
}

/// `in`: element-of for arrays, key-of or sub-block-of for blocks,
/// substring for strings.
fn contains(left: &Value, right: &Value, span: Option<Span>) -> Result<Value, FangError> {
    match (left, right) {
        (needle, Value::Array(values)) => Ok(Value::Bool(
            values.borrow().iter().any(|element| element.equals(needle)),
        )),

        (Value::String(key), Value::Block(entries)) => {
            Ok(Value::Bool(entries.borrow().contains_key(key)))
        }

        (Value::Block(sub), Value::Block(of)) => {
            let sub = sub.borrow();
            let of = of.borrow();
            let included = sub
                .iter()
                .all(|(key, value)| of.get(key).map(|v| v.equals(value)).unwrap_or(false));
            Ok(Value::Bool(included))
        }

        (Value::String(needle), Value::String(haystack)) => {
            Ok(Value::Bool(haystack.contains(needle.as_str())))
        }

        _ => Err(type_error("in", left, right, span)),
    }
}

// ---------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
    )
}

fn scalar_text(value: &Value, config: &Config, span: Option<Span>) -> Result<String, FangError> {
    display::string_of(value, config).map_err(|e| e.or_span(span))
}

fn both_numeric(left: &Value, right: &Value) -> Option<(f64, f64)> {
    Some((as_f64(left)?, as_f64(right)?))
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// Division and remainder results collapse to `Int` when the
/// mathematical result is integral and fits.
fn integral_to_int(value: f64, config: &Config, span: Option<Span>) -> Result<Value, FangError> {
    if value.is_finite()
        && value.fract() == 0.0
        && value >= -(i64::MAX as f64)
        && value <= i64::MAX as f64
    {
        return Ok(Value::Int(value as i64));
    }
    guard_float(value, config, span)
}
