/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Collection & Output Builtins
 * ----------------------------
 * `len`, `insert`, `strip` and `print`.
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

/// `len(x)`: elements of an array or block, characters of a string.
pub(crate) fn len(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    super::expect_arity("'len'", "len(array_block_or_string)", args, 1, span)?;
    let value = interpreter.evaluate(&args[0])?;

    let length = match &value {
        Value::String(s) => s.chars().count(),
        Value::Array(values) => values.borrow().len(),
        Value::Block(entries) => entries.borrow().len(),
        other => {
            return Err(FangError::eval_error(
                format!("'len' needs an array, block or string, not {}", other.type_name()),
                span,
            ));
        }
    };
    Ok(Value::Int(length as i64))
}

/// `insert(array, index, value)`: in-place insertion. A negative index
/// wraps from the end; `len(array)` appends; anything further out is an
/// error.
pub(crate) fn insert(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    super::expect_arity("'insert'", "insert(array, index, value)", args, 3, span)?;

    let target = interpreter.evaluate(&args[0])?;
    let Value::Array(values) = &target else {
        return Err(FangError::eval_error(
            format!("'insert' needs an array, not {}", target.type_name()),
            span,
        ));
    };

    let index = match interpreter.evaluate(&args[1])? {
        Value::Int(i) => i,
        Value::Float(f) if f.fract() == 0.0 => f as i64,
        other => {
            return Err(FangError::eval_error(
                format!("'insert' index must be an integer, not {}", other.type_name()),
                span,
            ));
        }
    };

    let value = interpreter.evaluate(&args[2])?.deep_copy();

    let len = values.borrow().len();
    if len + 1 > interpreter.config().max_array_size {
        return Err(FangError::eval_error(
            format!(
                "array size reaches maximum ({})",
                interpreter.config().max_array_size
            ),
            span,
        ));
    }

    let position = if index < 0 {
        index + len as i64
    } else {
        index
    };
    if position < 0 || position > len as i64 {
        return Err(FangError::eval_error(
            format!("index {} is out of range", index),
            span,
        ));
    }

    values.borrow_mut().insert(position as usize, value);
    Ok(Value::Undefined)
}

/// `strip(s)`: removes ordinary whitespace and the full-width space
/// from both ends.
pub(crate) fn strip(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    super::expect_arity("'strip'", "strip(string)", args, 1, span)?;
    let value = interpreter.evaluate(&args[0])?;

    match &value {
        Value::String(s) => {
            let stripped = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{3000}');
            Ok(Value::String(stripped.to_string()))
        }
        other => Err(FangError::eval_error(
            format!("'strip' needs a string, not {}", other.type_name()),
            span,
        )),
    }
}

/// `print(x, …)`: the comma-joined canonical form to standard output.
pub(crate) fn print(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        let value = interpreter.evaluate(arg)?;
        let text =
            display::string_of(&value, interpreter.config()).map_err(|e| e.or_span(span))?;
        parts.push(text);
    }

    println!("{}", parts.join(", "));
    Ok(Value::Undefined)
}
