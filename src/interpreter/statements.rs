/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Statement Evaluation
 * --------------------
 * Assignment through member chains (including the parameter-alias
 * rewrite), removal, `return` with closure capture, and the loop engine
 * every looping builtin lowers to.
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
use crate::environment::{self, is_reserved_name, BREAK, CONTINUE, RETURN};
use crate::error::FangError;
use crate::interpreter::expressions::{index_value, wrap_index};
use crate::interpreter::{operations, Interpreter};
use crate::span::Span;
use crate::value::Value;

/// Internal operator marking a deletion; never produced by the parser's
/// assignment grammar.
pub(crate) const REMOVE_OP: &str = "remove";

impl Interpreter {
    pub(crate) fn evaluate_set(
        &mut self,
        members: &[Node],
        op: &str,
        value: &Node,
        span: Option<Span>,
    ) -> Result<Value, FangError> {
        let computed = self.evaluate(value)?.deep_copy();

        // `:=` records the block result and ignores the written-out
        // target.
        if op == ":=" {
            self.env.borrow_mut().set_result(computed);
            return Ok(Value::Undefined);
        }

        self.apply_assignment(members, op, computed, span)?;
        Ok(Value::Undefined)
    }

    pub(crate) fn evaluate_remove(
        &mut self,
        members: &[Node],
        span: Option<Span>,
    ) -> Result<Value, FangError> {
        self.apply_assignment(members, REMOVE_OP, Value::Undefined, span)?;
        Ok(Value::Undefined)
    }

    /// The shared write path behind `Set` and `Remove`.
    fn apply_assignment(
        &mut self,
        members: &[Node],
        op: &str,
        value: Value,
        span: Option<Span>,
    ) -> Result<(), FangError> {
        let head = match &members[0] {
            Node::Identifier { name, .. } => name.clone(),
            Node::Literal {
                value: Value::String(name),
                ..
            } => name.clone(),
            other => {
                return Err(FangError::eval_error(
                    "an assignment must start from a variable name",
                    other.span().or(span),
                ));
            }
        };

        if is_reserved_name(&head) {
            return Err(FangError::eval_error(
                format!("'{}' is a reserved name", head),
                span,
            ));
        }

        // `x: v` on a plain name always (re)defines in the current scope,
        // even when `x` is currently a parameter alias; the local simply
        // shadows it.
        if op == ":" && members.len() == 1 {
            self.env.borrow_mut().define(head, value);
            return Ok(());
        }

        // A head bound to a `Get` alias redirects the write into the
        // argument array the alias points at, so parameter writes reach
        // `_[i]` (and, for reference parameters, the caller's value).
        if let Some((Value::Expr(alias), holder)) = environment::lookup(&self.env, &head) {
            if let Node::Get {
                members: alias_members,
                ..
            } = alias.as_ref()
            {
                let mut keys = Vec::new();
                for member in &alias_members[1..] {
                    keys.push(self.evaluate(member)?);
                }
                for member in &members[1..] {
                    keys.push(self.evaluate(member)?);
                }

                let alias_head = match &alias_members[0] {
                    Node::Identifier { name, .. } => name.clone(),
                    other => {
                        return Err(FangError::eval_error(
                            "malformed parameter alias",
                            other.span().or(span),
                        ));
                    }
                };

                let base = environment::lookup(&holder, &alias_head)
                    .map(|(value, _)| value)
                    .unwrap_or(Value::Undefined);
                return self.set_in_container(&base, &keys, op, value, span);
            }
        }

        // Plain single-name target.
        if members.len() == 1 {
            return self.assign_name(&head, op, value, span);
        }

        // Chained target: descend into the container and mutate the leaf.
        let mut keys = Vec::new();
        for member in &members[1..] {
            keys.push(self.evaluate(member)?);
        }

        let base = self.env.borrow().get(&head);
        if base.is_undefined() {
            return Err(FangError::eval_error(
                format!("'{}' is not defined", head),
                span,
            ));
        }
        self.set_in_container(&base, &keys, op, value, span)
    }

    fn assign_name(
        &mut self,
        name: &str,
        op: &str,
        value: Value,
        span: Option<Span>,
    ) -> Result<(), FangError> {
        match op {
            "=" => {
                self.env.borrow_mut().set(name, value);
                Ok(())
            }
            REMOVE_OP => {
                self.env.borrow_mut().remove(name);
                Ok(())
            }
            _ => {
                // Compound operator: read, combine, write back. A name
                // that does not exist yet combines from null.
                let old = match self.env.borrow().get(name) {
                    Value::Undefined => Value::Null,
                    existing => existing,
                };
                let combined =
                    operations::binary(base_operator(op), &old, &value, &self.config, span)?;
                self.env.borrow_mut().set(name, combined);
                Ok(())
            }
        }
    }

    /// Walks `keys` down from `base`, mutating at the leaf. Unlike reads,
    /// a missing intermediate member or an out-of-range index is an
    /// error here; only the final member of a block chain may be new.
    fn set_in_container(
        &self,
        base: &Value,
        keys: &[Value],
        op: &str,
        value: Value,
        span: Option<Span>,
    ) -> Result<(), FangError> {
        let (key, rest) = keys.split_first().expect("chained target has keys");

        if !rest.is_empty() {
            let next = index_value(base, key, span)?.ok_or_else(|| {
                FangError::eval_error(
                    format!("no member '{}' to assign through", display_key(key)),
                    span,
                )
            })?;
            if matches!(next, Value::Null) {
                return Err(FangError::eval_error(
                    format!("cannot assign through null member '{}'", display_key(key)),
                    span,
                ));
            }
            return self.set_in_container(&next, rest, op, value, span);
        }

        match (base, key) {
            (Value::Array(values), Value::Int(_) | Value::Float(_)) => {
                let index = self.concrete_index(key, values.borrow().len(), span)?;
                if op == REMOVE_OP {
                    values.borrow_mut().remove(index);
                    return Ok(());
                }
                let written = if op == "=" || op == ":" {
                    value
                } else {
                    let old = values.borrow()[index].clone();
                    operations::binary(base_operator(op), &old, &value, &self.config, span)?
                };
                values.borrow_mut()[index] = written;
                Ok(())
            }

            (Value::Block(entries), Value::String(name)) => {
                if op == REMOVE_OP {
                    entries.borrow_mut().shift_remove(name);
                    return Ok(());
                }
                let written = if op == "=" || op == ":" {
                    value
                } else {
                    let old = entries.borrow().get(name).cloned().unwrap_or(Value::Null);
                    operations::binary(base_operator(op), &old, &value, &self.config, span)?
                };

                let mut entries = entries.borrow_mut();
                if !entries.contains_key(name) && entries.len() >= self.config.max_array_size {
                    return Err(self.array_size_error(span));
                }
                entries.insert(name.clone(), written);
                Ok(())
            }

            (Value::Block(entries), Value::Int(_) | Value::Float(_)) => {
                let index = self.concrete_index(key, entries.borrow().len(), span)?;
                if op == REMOVE_OP {
                    entries.borrow_mut().shift_remove_index(index);
                    return Ok(());
                }
                let written = if op == "=" || op == ":" {
                    value
                } else {
                    let (_, old) = entries
                        .borrow()
                        .get_index(index)
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .expect("index checked");
                    operations::binary(base_operator(op), &old, &value, &self.config, span)?
                };
                let mut entries = entries.borrow_mut();
                let (_, slot) = entries.get_index_mut(index).expect("index checked");
                *slot = written;
                Ok(())
            }

            (Value::Array(_) | Value::Block(_), other) => Err(FangError::eval_error(
                format!("'{}' is not a valid index", display_key(other)),
                span,
            )),

            (other, _) => Err(FangError::eval_error(
                format!("cannot assign into {}", other.type_name()),
                span,
            )),
        }
    }

    /// An index for the write path: negative wraps, anything out of
    /// range is an error.
    fn concrete_index(
        &self,
        key: &Value,
        len: usize,
        span: Option<Span>,
    ) -> Result<usize, FangError> {
        let raw = match key {
            Value::Int(i) => *i,
            Value::Float(f) if f.fract() == 0.0 => *f as i64,
            other => {
                return Err(FangError::eval_error(
                    format!("'{}' is not a valid index", display_key(other)),
                    span,
                ));
            }
        };
        wrap_index(raw, len).ok_or_else(|| {
            FangError::eval_error(format!("index {} is out of range", raw), span)
        })
    }

    pub(crate) fn evaluate_return(
        &mut self,
        value: Option<&Node>,
        _span: Option<Span>,
    ) -> Result<Value, FangError> {
        let result = match value {
            Some(node) => self.evaluate(node)?,
            None => Value::Null,
        };

        // A function value leaving its defining scope closes over it.
        let result = match result {
            Value::Function(func) if func.captured.is_none() => {
                Value::Function(func.reference(Some(self.env.clone())))
            }
            other => other,
        };

        self.env.borrow_mut().set(RETURN, result);
        Ok(Value::Undefined)
    }

    /// The loop engine (see [`LoopNode`] for the shape). The body runs in
    /// the *current* environment, so variables it creates survive the
    /// loop.
    pub(crate) fn evaluate_loop(&mut self, lowered: &LoopNode) -> Result<Value, FangError> {
        // A for-in collection is snapshotted (deep copy) at entry; a
        // block expands to [key, value] pairs.
        let iteration_values = match &lowered.iterator {
            Some(node) => {
                let collection = self.evaluate(node)?;
                let values = match &collection {
                    Value::Array(values) => {
                        values.borrow().iter().map(Value::deep_copy).collect()
                    }
                    Value::Block(entries) => entries
                        .borrow()
                        .iter()
                        .map(|(key, value)| {
                            Value::array(vec![Value::String(key.clone()), value.deep_copy()])
                        })
                        .collect::<Vec<_>>(),
                    other => {
                        return Err(FangError::eval_error(
                            format!("'{}' cannot iterate over {}", lowered.label, other.type_name()),
                            lowered.span,
                        ));
                    }
                };
                Some(values)
            }
            None => None,
        };

        let mut first = true;
        let mut next_element = 0usize;
        let mut executed = 0usize;

        loop {
            // Condition sequence: `initial` on entry, `continuous` after;
            // the last expression gates the iteration. An empty sequence
            // always proceeds.
            let sequence = if first {
                &lowered.initial
            } else {
                &lowered.continuous
            };
            first = false;

            let mut proceed = true;
            for (i, condition) in sequence.iter().enumerate() {
                let value = self.evaluate(condition)?;
                if i + 1 == sequence.len() {
                    proceed = value.is_truthy();
                }
            }
            if !proceed {
                break;
            }

            if let Some(values) = &iteration_values {
                if next_element >= values.len() {
                    break;
                }
                let element = values[next_element].deep_copy();
                next_element += 1;
                if let Some(name) = &lowered.each {
                    self.env.borrow_mut().define(name.clone(), element);
                }
            }

            executed += 1;
            if executed > self.config.max_loop_times {
                return Err(FangError::eval_error(
                    format!(
                        "loop count reaches maximum ({})",
                        self.config.max_loop_times
                    ),
                    lowered.span,
                ));
            }

            for statement in &lowered.statements {
                self.evaluate(statement)?;
                if self.unwinding() {
                    break;
                }
            }

            // Observe and clear this loop's signals; a pending return is
            // left in place for the enclosing function to see.
            let continuing = self.env.borrow().contains(CONTINUE);
            if continuing {
                self.env.borrow_mut().remove(CONTINUE);
            }

            let breaking = self.env.borrow().contains(BREAK);
            if breaking {
                self.env.borrow_mut().remove(BREAK);
                break;
            }

            if !self.env.borrow().get(RETURN).is_undefined() {
                break;
            }
        }

        Ok(Value::Undefined)
    }
}

/// `+=` → `+`, `-=` → `-`, …
fn base_operator(op: &str) -> &str {
    op.strip_suffix('=').unwrap_or(op)
}

fn display_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        other => other.type_name().to_string(),
    }
}
