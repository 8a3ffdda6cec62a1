/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Standard Library Registry
 * -------------------------
 * The fixed name→builtin table. Builtins are invoked through the same
 * call mechanism as user functions (which shadow them), receive their
 * arguments unevaluated, and call back into the evaluator as needed;
 * that is how `if` and the loops get lazy bodies without special parser
 * support.
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

pub mod collections;
pub mod control;
pub mod convert;

use crate::ast::Node;
use crate::error::FangError;
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::Value;

/// A builtin receives the evaluator, the call's unevaluated arguments,
/// and the call site.
pub(crate) type Builtin =
    fn(&mut Interpreter, &[Node], Option<Span>) -> Result<Value, FangError>;

pub fn is_builtin(name: &str) -> bool {
    lookup(name).is_some()
}

pub(crate) fn lookup(name: &str) -> Option<Builtin> {
    Some(match name {
        "if" => control::if_,
        "do" => control::do_,
        "while" => control::while_,
        "for" => control::for_,

        "int" => convert::int,
        "float" => convert::float,
        "string" => convert::string,
        "type" => convert::type_of,

        "len" => collections::len,
        "insert" => collections::insert,
        "strip" => collections::strip,
        "print" => collections::print,

        _ => return None,
    })
}

pub(crate) fn dispatch(
    interpreter: &mut Interpreter,
    name: &str,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    let handler = lookup(name).ok_or_else(|| {
        FangError::eval_error(format!("'{}' is not a defined function", name), span)
    })?;
    handler(interpreter, args, span)
}

/// Shared arity check with the builtin's own usage string in the error.
pub(crate) fn expect_arity(
    name: &str,
    usage: &str,
    args: &[Node],
    count: usize,
    span: Option<Span>,
) -> Result<(), FangError> {
    if args.len() == count {
        return Ok(());
    }
    Err(FangError::eval_error(
        format!("{} takes {} argument(s)", name, count),
        span,
    )
    .with_help(format!("usage: {}", usage)))
}
