/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Control-Flow Builtins
 * ---------------------
 * `if`, `do`, `while` and `for`. The looping three lower their arguments
 * into the evaluator's Loop node; `if` runs the matching body directly.
 * Bodies execute in the caller's environment, so variables they create
 * are visible after the construct.
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

use crate::ast::{LoopNode, Node};
use crate::error::FangError;
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::Value;

/// `if(cond1, body1, cond2, body2, …)`: evaluates conditions in order
/// and runs the first truthy one's body, returning that body's value.
/// An always-true condition serves as the `else` arm.
pub(crate) fn if_(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    if args.is_empty() || args.len() % 2 != 0 {
        return Err(FangError::eval_error(
            "'if' takes an even number of arguments",
            span,
        )
        .with_help("usage: if(condition, body, condition, body, …)"));
    }

    for pair in args.chunks(2) {
        if interpreter.evaluate(&pair[0])?.is_truthy() {
            return run_body(interpreter, &pair[1]);
        }
    }

    Ok(Value::Undefined)
}

/// `do(body)`: loops until `break` or `return` (or the loop ceiling).
pub(crate) fn do_(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    super::expect_arity("'do'", "do(body)", args, 1, span)?;

    let lowered = Node::Loop(Box::new(LoopNode {
        label: "do".to_string(),
        initial: Vec::new(),
        continuous: Vec::new(),
        statements: body_statements(&args[0]),
        each: None,
        iterator: None,
        span,
    }));
    interpreter.evaluate(&lowered)
}

/// `while(condition, body)`: standard pre-test loop.
pub(crate) fn while_(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    super::expect_arity("'while'", "while(condition, body)", args, 2, span)?;

    let lowered = Node::Loop(Box::new(LoopNode {
        label: "while".to_string(),
        initial: vec![args[0].clone()],
        continuous: vec![args[0].clone()],
        statements: body_statements(&args[1]),
        each: None,
        iterator: None,
        span,
    }));
    interpreter.evaluate(&lowered)
}

/// `for(x in collection, body)` or `for(initial, condition, update,
/// body)`. The C-style form runs `initial` once and `update` before the
/// condition on every later iteration.
pub(crate) fn for_(
    interpreter: &mut Interpreter,
    args: &[Node],
    span: Option<Span>,
) -> Result<Value, FangError> {
    let lowered = match args {
        [Node::Binary {
            left, op, right, ..
        }, body]
            if op == "in" =>
        {
            let Node::Identifier { name, .. } = left.as_ref() else {
                return Err(FangError::eval_error(
                    "the loop variable must be a plain name",
                    left.span().or(span),
                ));
            };
            LoopNode {
                label: "for".to_string(),
                initial: Vec::new(),
                continuous: Vec::new(),
                statements: body_statements(body),
                each: Some(name.clone()),
                iterator: Some(right.as_ref().clone()),
                span,
            }
        }

        [initial, condition, update, body] => LoopNode {
            label: "for".to_string(),
            initial: vec![initial.clone(), condition.clone()],
            continuous: vec![update.clone(), condition.clone()],
            statements: body_statements(body),
            each: None,
            iterator: None,
            span,
        },

        _ => {
            return Err(FangError::eval_error("'for' arguments are malformed", span)
                .with_help(
                    "usage: for(x in collection, body) or for(initial, condition, update, body)",
                ));
        }
    };

    interpreter.evaluate(&Node::Loop(Box::new(lowered)))
}

/// A block body contributes its statement list; any other node is a
/// single-statement body.
fn body_statements(node: &Node) -> Vec<Node> {
    match node {
        Node::Block { statements, .. } => statements.clone(),
        other => vec![other.clone()],
    }
}

/// Runs an `if` body in the current environment and yields the last
/// value it produced.
fn run_body(interpreter: &mut Interpreter, node: &Node) -> Result<Value, FangError> {
    match node {
        Node::Block { statements, .. } => interpreter.run_statements(statements, false),
        other => interpreter.evaluate(other),
    }
}
