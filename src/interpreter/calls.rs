/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Call Dispatch & Invocation
 * --------------------------
 * Resolves call targets (user functions, deferred bodies, the standard
 * library) and implements the function-call protocol: the `_` argument
 * array, parameter aliases, `function`/`reference` modifiers, and closure
 * environments.
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

use crate::ast::{Node, ParamModifier};
use crate::environment::{self, Environment};
use crate::error::FangError;
use crate::globals;
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::{FunctionValue, Value};

impl Interpreter {
    /// Resolves and invokes a call target.
    ///
    /// An identifier resolves through the environment first (a user
    /// function shadows a standard-library name) and falls back to the
    /// builtin registry. Member chains and other expressions are
    /// evaluated to obtain the callable.
    pub(crate) fn evaluate_call(
        &mut self,
        target: &Node,
        args: &[Node],
        span: Option<Span>,
    ) -> Result<Value, FangError> {
        match target {
            Node::Identifier { name, .. } => match environment::lookup(&self.env, name) {
                Some((Value::Function(func), _)) => self.call_function(&func, args, span),

                Some((Value::Expr(node), holder)) => {
                    let resolved = if matches!(node.as_ref(), Node::Get { .. }) {
                        self.evaluate_in(&holder, &node)?
                    } else {
                        Value::Expr(node)
                    };
                    self.call_resolved(resolved, args, span, name)
                }

                Some((other, _)) => Err(FangError::eval_error(
                    format!("'{}' is not a function (it is {})", name, other.type_name()),
                    span,
                )),

                None => {
                    if globals::is_builtin(name) {
                        return globals::dispatch(self, name, args, span);
                    }
                    Err(FangError::eval_error(
                        format!("'{}' is not a defined function", name),
                        span,
                    ))
                }
            },

            other => {
                let resolved = self.evaluate(other)?;
                self.call_resolved(resolved, args, span, "expression")
            }
        }
    }

    /// Invokes whatever a call target resolved to. A deferred block (a
    /// `function`-modifier argument) is evaluated directly as an
    /// anonymous body; a deferred builtin name dispatches into the
    /// standard library.
    fn call_resolved(
        &mut self,
        resolved: Value,
        args: &[Node],
        span: Option<Span>,
        label: &str,
    ) -> Result<Value, FangError> {
        match resolved {
            Value::Function(func) => self.call_function(&func, args, span),

            Value::Expr(node) => match node.as_ref() {
                Node::Block { .. } => self.evaluate(&node),

                Node::Identifier { name, .. } if globals::is_builtin(name) => {
                    let name = name.clone();
                    globals::dispatch(self, &name, args, span)
                }

                _ => {
                    let value = self.evaluate(&node)?;
                    if matches!(value, Value::Expr(_)) {
                        return Err(FangError::eval_error(
                            format!("'{}' is not a function", label),
                            span,
                        ));
                    }
                    self.call_resolved(value, args, span, label)
                }
            },

            other => Err(FangError::eval_error(
                format!("'{}' is not a function (it is {})", label, other.type_name()),
                span,
            )),
        }
    }

    /// The function-call protocol:
    ///
    /// 1. Evaluate the arguments in the caller's scope into the implicit
    ///    `_` array; unevaluated for `function` formals, by identity for
    ///    `reference` formals, deep-copied otherwise.
    /// 2. Enter the working environment: the captured one for closures,
    ///    else a fresh child of the caller's.
    /// 3. Bind each formal to an alias into `_[i]`, so reads and writes
    ///    go through the argument array.
    /// 4. Evaluate the body block and restore the caller's environment.
    pub(crate) fn call_function(
        &mut self,
        func: &FunctionValue,
        args: &[Node],
        span: Option<Span>,
    ) -> Result<Value, FangError> {
        let formals = &func.callee.params;

        let mut arg_values = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let modifier = formals
                .get(i)
                .map(|formal| formal.modifier)
                .unwrap_or(ParamModifier::None);

            let value = match modifier {
                ParamModifier::Function => Value::Expr(Rc::new(arg.clone())),
                ParamModifier::Reference => self.evaluate(arg)?,
                ParamModifier::None => self.evaluate(arg)?.deep_copy(),
            };
            arg_values.push(value);
        }

        if arg_values.len() > self.config.max_array_size {
            return Err(self.array_size_error(span));
        }

        let working_env = match &func.captured {
            Some(captured) => captured.clone(),
            None => Environment::new_ref(Some(self.env.clone())),
        };
        let saved = std::mem::replace(&mut self.env, working_env);

        self.env.borrow_mut().define("_", Value::array(arg_values));

        for (i, formal) in formals.iter().enumerate() {
            let alias = Node::Get {
                members: vec![
                    Node::Identifier {
                        name: "_".to_string(),
                        span: None,
                    },
                    Node::Literal {
                        value: Value::Int(i as i64),
                        span: None,
                    },
                ],
                span: None,
            };
            self.env
                .borrow_mut()
                .define(formal.name.clone(), Value::Expr(Rc::new(alias)));
        }

        let result = self.evaluate(&func.callee.body);

        self.env = saved;
        result
    }
}
