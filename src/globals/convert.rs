/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Conversion Builtins
 * -------------------
 * `int`, `float`, `string` and `type`.
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

use crate::ast::Node;
use crate::error::FangError;
use crate::interpreter::{display, Interpreter};
use crate::span::Span;
use crate::value::Value;

/// `int(x)`: coerces a number or a numeric string, truncating toward
/// zero. NaN and infinities are rejected.
pub(crate) fn int(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    super::expect_arity("'int'", "int(number_or_string)", args, 1, span)?;
    let value = interpreter.evaluate(&args[0])?;

    match &value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(f) => float_to_int(*f, span),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Int(n));
            }
            match text.parse::<f64>() {
                Ok(f) => float_to_int(f, span),
                Err(_) => Err(FangError::eval_error(
                    format!("'{}' is not a number", s),
                    span,
                )),
            }
        }
        other => Err(FangError::eval_error(
            format!("'int' needs a number or a numeric string, not {}", other.type_name()),
            span,
        )),
    }
}

fn float_to_int(value: f64, span: Option<Span>) -> Result<Value, FangError> {
    if !value.is_finite() {
        return Err(FangError::eval_error(
            "'int' cannot convert a non-finite number",
            span,
        ));
    }
    if value < -(i64::MAX as f64) || value > i64::MAX as f64 {
        return Err(FangError::eval_error(
            format!("'{}' is out of the integer range", value),
            span,
        ));
    }
    Ok(Value::Int(value as i64))
}

/// `float(x)`: coerces a number or a numeric string. NaN and infinities
/// are rejected regardless of the `nan`/`infinity` options.
pub(crate) fn float(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    super::expect_arity("'float'", "float(number_or_string)", args, 1, span)?;
    let value = interpreter.evaluate(&args[0])?;

    match &value {
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Float(f) if f.is_finite() => Ok(Value::Float(*f)),
        Value::Float(_) => Err(FangError::eval_error(
            "'float' cannot convert a non-finite number",
            span,
        )),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Value::Float(f)),
            _ => Err(FangError::eval_error(
                format!("'{}' is not a number", s),
                span,
            )),
        },
        other => Err(FangError::eval_error(
            format!("'float' needs a number or a numeric string, not {}", other.type_name()),
            span,
        )),
    }
}

/// `string(x)`: the canonical textual form.
pub(crate) fn string(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    super::expect_arity("'string'", "string(value)", args, 1, span)?;
    let value = interpreter.evaluate(&args[0])?;
    let text = display::string_of(&value, interpreter.config()).map_err(|e| e.or_span(span))?;
    Ok(Value::String(text))
}

/// `type(x)`: the script-visible type name.
pub(crate) fn type_of(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    super::expect_arity("'type'", "type(value)", args, 1, span)?;
    let value = interpreter.evaluate(&args[0])?;

    let name = match &value {
        // Deferred bodies and library references read as functions.
        Value::Expr(_) => "function",
        other => other.type_name(),
    };
    Ok(Value::String(name.to_string()))
}
