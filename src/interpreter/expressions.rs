/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Expression Evaluation
 * ---------------------
 * Literals, identifiers (including parameter aliases and deferred
 * arguments), array literals, binary dispatch with short-circuiting, and
 * member-chain reads.
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

use std::rc::Rc;

use crate::ast::Node;
use crate::environment::{self, EnvRef};
use crate::error::FangError;
use crate::interpreter::{operations, Interpreter};
use crate::span::Span;
use crate::value::Value;

impl Interpreter {
    /// Name lookup.
    ///
    /// The special name `.` reads the implicit slot. A binding holding a
    /// `Get` alias (parameter binding) is resolved against the scope the
    /// alias was bound in; a deferred `function`-modifier argument found
    /// that way is then evaluated here. An unknown name yields `null`,
    /// unless it names a standard-library method; then the identifier
    /// itself is yielded so a call can dispatch on it.
    pub(crate) fn evaluate_identifier(
        &mut self,
        name: &str,
        span: Option<Span>,
    ) -> Result<Value, FangError> {
        if name == "." {
            let slot = self.env.borrow().result();
            return Ok(if slot.is_undefined() { Value::Null } else { slot });
        }

        match environment::lookup(&self.env, name) {
            Some((Value::Expr(node), holder)) => {
                let resolved = match node.as_ref() {
                    Node::Get { .. } => self.evaluate_in(&holder, &node)?,
                    _ => self.evaluate(&node)?,
                };
                match resolved {
                    Value::Expr(deferred) => self.evaluate(&deferred),
                    value => Ok(value),
                }
            }

            Some((value, _)) => Ok(value),

            None => {
                if crate::globals::is_builtin(name) {
                    return Ok(Value::Expr(Rc::new(Node::Identifier {
                        name: name.to_string(),
                        span,
                    })));
                }
                Ok(Value::Null)
            }
        }
    }

    /// Evaluates `node` with `env` as the current environment. Aliases
    /// must resolve where they were bound, not where they were read.
    pub(crate) fn evaluate_in(&mut self, env: &EnvRef, node: &Node) -> Result<Value, FangError> {
        let saved = std::mem::replace(&mut self.env, env.clone());
        let result = self.evaluate(node);
        self.env = saved;
        result
    }

    pub(crate) fn evaluate_array(
        &mut self,
        elements: &[Node],
        span: Option<Span>,
    ) -> Result<Value, FangError> {
        if elements.len() > self.config.max_array_size {
            return Err(self.array_size_error(span));
        }

        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(self.evaluate(element)?);
        }
        Ok(Value::array(values))
    }

    pub(crate) fn array_size_error(&self, span: Option<Span>) -> FangError {
        FangError::eval_error(
            format!("array size reaches maximum ({})", self.config.max_array_size),
            span,
        )
    }

    /// Binary dispatch. `and`/`or` short-circuit on the left operand's
    /// truthiness; `not` and sign operators come in with a blank left
    /// side; everything else evaluates both sides and consults the
    /// operator tables.
    pub(crate) fn evaluate_binary(
        &mut self,
        left: &Node,
        op: &str,
        right: &Node,
        span: Option<Span>,
    ) -> Result<Value, FangError> {
        match op {
            "or" => {
                if self.evaluate(left)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.evaluate(right)?.is_truthy()))
            }

            "and" => {
                if !self.evaluate(left)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.evaluate(right)?.is_truthy()))
            }

            "not" => {
                let operand = self.evaluate(right)?;
                Ok(Value::Bool(!operand.is_truthy()))
            }

            _ if matches!(left, Node::Blank) => {
                let operand = self.evaluate(right)?;
                operations::unary(op, &operand, &self.config, span)
            }

            _ => {
                let lhs = self.evaluate(left)?;
                let rhs = self.evaluate(right)?;
                operations::binary(op, &lhs, &rhs, &self.config, span)
            }
        }
    }

    /// Member-chain read: `a.b[i].c`. A null base or a missing member
    /// yields `null` and stops the chain; type mismatches abort.
    pub(crate) fn evaluate_get(
        &mut self,
        members: &[Node],
        _span: Option<Span>,
    ) -> Result<Value, FangError> {
        let mut current = self.evaluate(&members[0])?;

        for member in &members[1..] {
            if matches!(current, Value::Null) {
                return Ok(Value::Null);
            }

            let key = self.evaluate(member)?;
            match index_value(&current, &key, member.span())? {
                Some(next) => current = next,
                None => return Ok(Value::Null),
            }
        }

        Ok(current)
    }
}

/// Indexes one step into a container.
///
/// Returns `Ok(None)` for a missing key or an out-of-range index; the
/// read path turns that into `null`, the write path into an error.
pub(crate) fn index_value(
    container: &Value,
    key: &Value,
    span: Option<Span>,
) -> Result<Option<Value>, FangError> {
    match (container, key) {
        (Value::Array(values), Value::Int(i)) => {
            let values = values.borrow();
            Ok(wrap_index(*i, values.len()).map(|idx| values[idx].clone()))
        }

        (Value::Block(entries), Value::String(name)) => {
            Ok(entries.borrow().get(name).cloned())
        }

        // Blocks are insertion-ordered, so an integer key is positional.
        (Value::Block(entries), Value::Int(i)) => {
            let entries = entries.borrow();
            Ok(wrap_index(*i, entries.len()).map(|idx| {
                let (_, value) = entries.get_index(idx).expect("index checked");
                value.clone()
            }))
        }

        (Value::Array(_) | Value::Block(_), Value::Float(f)) => {
            if f.fract() == 0.0 {
                index_value(container, &Value::Int(*f as i64), span)
            } else {
                Err(FangError::eval_error(
                    format!("'{}' is not a valid index", f),
                    span,
                ))
            }
        }

        (Value::Array(_) | Value::Block(_), Value::Bool(_)) => Err(FangError::eval_error(
            "a boolean cannot be used as an index",
            span,
        )),

        (Value::Array(_), other) => Err(FangError::eval_error(
            format!("an array index must be a number, not {}", other.type_name()),
            span,
        )),

        (Value::Block(_), other) => Err(FangError::eval_error(
            format!("a block member must be a name or a number, not {}", other.type_name()),
            span,
        )),

        (other, _) => Err(FangError::eval_error(
            format!("cannot read a member of {}", other.type_name()),
            span,
        )),
    }
}

/// Resolves a possibly negative index against `len`; `None` when out of
/// range.
pub(crate) fn wrap_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let idx = if index < 0 { len + index } else { index };
    if idx >= 0 && idx < len {
        Some(idx as usize)
    } else {
        None
    }
}
