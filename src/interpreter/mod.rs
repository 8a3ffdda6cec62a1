/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Evaluator Core
 * --------------
 * The tree-walking evaluator. This module owns the interpreter state
 * (the current environment, the explicit frame stack, and the engine
 * configuration) and dispatches every AST node. The actual node
 * semantics are split across:
 *
 *  - expressions.rs → literals, identifiers, arrays, blocks, member reads
 *  - statements.rs  → assignment, removal, loops, return, host injection
 *  - calls.rs       → call resolution and the function-call protocol
 *  - operations.rs  → the binary-operator tables
 *  - display.rs     → canonical textual form of values
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

pub mod calls;
pub mod display;
pub mod expressions;
pub mod operations;
pub mod statements;

use crate::ast::{BlockType, Node};
use crate::config::Config;
use crate::environment::{Environment, EnvRef, BREAK, CONTINUE, RETURN};
use crate::error::FangError;
use crate::span::Span;
use crate::value::Value;

/// What a stack frame was pushed for. Loops and function bodies matter
/// for scoping `break`/`continue`; everything else only counts toward
/// the depth ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameKind {
    Loop,
    Function,
    Other,
}

pub struct Interpreter {
    pub(crate) env: EnvRef,
    pub(crate) config: Config,
    frames: Vec<FrameKind>,
}

impl Interpreter {
    pub fn new(config: Config) -> Self {
        Self {
            env: Environment::new_ref(None),
            config,
            frames: Vec::new(),
        }
    }

    /// An interpreter whose root scope encloses `env`; used to run
    /// method calls against an instance's persistent environment.
    pub fn with_enclosing(config: Config, env: EnvRef) -> Self {
        Self {
            env,
            config,
            frames: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current environment. After a class-constructor run this is the
    /// constructor's retained scope.
    pub fn environment(&self) -> EnvRef {
        self.env.clone()
    }

    /// Evaluates one node. Every recursive entry pushes a frame; hitting
    /// the configured ceiling aborts the run.
    pub fn evaluate(&mut self, node: &Node) -> Result<Value, FangError> {
        if self.frames.len() >= self.config.max_depth {
            return Err(FangError::eval_error(
                "recursive call times reach maximum",
                node.span(),
            ));
        }

        self.frames.push(Self::frame_kind(node));
        let result = self.dispatch(node);
        self.frames.pop();
        result
    }

    /// Runs a whole program as one block of the given type and returns
    /// its result. The block's environment becomes the interpreter's
    /// current environment for `ClassConstructor` runs.
    pub fn run_program(
        &mut self,
        statements: &[Node],
        block_type: BlockType,
    ) -> Result<Value, FangError> {
        self.frames.push(FrameKind::Function);
        let result = self.evaluate_block(block_type, statements);
        self.frames.pop();
        result
    }

    fn frame_kind(node: &Node) -> FrameKind {
        match node {
            Node::Loop(_) => FrameKind::Loop,
            block @ Node::Block { .. } if block.is_function_block() => FrameKind::Function,
            _ => FrameKind::Other,
        }
    }

    fn dispatch(&mut self, node: &Node) -> Result<Value, FangError> {
        match node {
            Node::Literal { value, span } => self.evaluate_literal(value, *span),
            Node::Identifier { name, span } => self.evaluate_identifier(name, *span),
            Node::Blank => Ok(Value::Undefined),
            Node::Array { elements, span } => self.evaluate_array(elements, *span),

            Node::Block {
                block_type,
                statements,
                ..
            } => self.evaluate_block(*block_type, statements),

            Node::Binary {
                left,
                op,
                right,
                span,
            } => self.evaluate_binary(left, op, right, *span),

            Node::Get { members, span } => self.evaluate_get(members, *span),

            Node::Callee(callee) => {
                let function = Value::Function(crate::value::FunctionValue::new(callee.clone()));
                if callee.name.is_empty() {
                    // Anonymous function expression: the definition is the
                    // value.
                    return Ok(function);
                }
                self.env.borrow_mut().define(callee.name.clone(), function);
                Ok(Value::Undefined)
            }

            Node::Call { target, args, span } => self.evaluate_call(target, args, *span),

            Node::Loop(lowered) => self.evaluate_loop(lowered),

            Node::Set {
                members,
                op,
                value,
                span,
            } => self.evaluate_set(members, op, value, *span),

            Node::Remove { members, span } => self.evaluate_remove(members, *span),

            Node::Return { value, span } => self.evaluate_return(value.as_deref(), *span),

            Node::Keyword { name, span } => self.evaluate_keyword(name, *span),

            Node::Injection { name, value, span } => self.evaluate_injection(name, value, *span),

            Node::Value { value, .. } => Ok(value.deep_copy()),
        }
    }

    /// Evaluates a braced statement sequence.
    ///
    /// Function-typed blocks get a fresh child environment with a
    /// `_return` slot; their result is, in priority order, the recorded
    /// return, the implicit last-expression slot, and finally the block's
    /// own bindings as a Block value (which is what turns `a: 3, b: 2`
    /// into an object). A lexical block only scopes its locals and yields
    /// its implicit slot. A class constructor keeps its environment: it
    /// stays current so the caller can retain it as instance state.
    pub(crate) fn evaluate_block(
        &mut self,
        block_type: BlockType,
        statements: &[Node],
    ) -> Result<Value, FangError> {
        let child = Environment::new_ref(Some(self.env.clone()));
        let saved = std::mem::replace(&mut self.env, child);

        let is_function = block_type != BlockType::LexicalBlock;
        if is_function {
            self.env.borrow_mut().define(RETURN, Value::Undefined);
        }

        let outcome = self.run_statements(statements, true);

        let result = outcome.and_then(|_| {
            if !is_function {
                let slot = self.env.borrow().result();
                return Ok(slot);
            }

            let recorded = self.env.borrow().get_local(RETURN);
            if !recorded.is_undefined() {
                return Ok(recorded);
            }

            let slot = self.env.borrow().result();
            if !slot.is_undefined() {
                return Ok(slot);
            }

            let entries = self.env.borrow().bindings().into_iter().collect();
            Ok(Value::block(entries))
        });

        let keep_env = block_type == BlockType::ClassConstructor && result.is_ok();
        if !keep_env {
            self.env = saved;
        }

        result
    }

    /// Runs statements in the current environment, checking the
    /// control-flow side channel after each one. Returns the value of the
    /// last statement that produced one.
    ///
    /// With `track_slot` the same value is recorded into the scope's
    /// implicit slot; blocks do this, loop and builtin bodies do not.
    pub(crate) fn run_statements(
        &mut self,
        statements: &[Node],
        track_slot: bool,
    ) -> Result<Value, FangError> {
        let mut last = Value::Undefined;

        for statement in statements {
            let value = self.evaluate(statement)?;

            if !value.is_undefined() {
                if track_slot {
                    self.env.borrow_mut().set_result(value.clone());
                }
                last = value;
            }

            if self.unwinding() {
                break;
            }
        }

        Ok(last)
    }

    /// True while a `return`, `break` or `continue` signal is pending in
    /// the environment chain.
    pub(crate) fn unwinding(&self) -> bool {
        let env = self.env.borrow();
        !env.get(RETURN).is_undefined() || env.contains(BREAK) || env.contains(CONTINUE)
    }

    /// `break`/`continue` must sit inside a loop frame that is closer
    /// than any enclosing function body.
    pub(crate) fn check_loop_scope(&self, keyword: &str, span: Option<Span>) -> Result<(), FangError> {
        for frame in self.frames.iter().rev().skip(1) {
            match frame {
                FrameKind::Loop => return Ok(()),
                FrameKind::Function => break,
                FrameKind::Other => continue,
            }
        }
        Err(FangError::eval_error(
            format!("'{}' appears outside of a loop", keyword),
            span,
        ))
    }

    fn evaluate_keyword(&mut self, name: &str, span: Option<Span>) -> Result<Value, FangError> {
        self.check_loop_scope(name, span)?;

        let channel = match name {
            "break" => BREAK,
            _ => CONTINUE,
        };
        self.env.borrow_mut().define(channel, Value::Bool(true));
        Ok(Value::Undefined)
    }

    fn evaluate_injection(
        &mut self,
        name: &str,
        value: &Value,
        span: Option<Span>,
    ) -> Result<Value, FangError> {
        if crate::environment::is_reserved_name(name) {
            return Err(FangError::eval_error(
                format!("'{}' is a reserved name", name),
                span,
            ));
        }
        self.env.borrow_mut().define(name, value.deep_copy());
        Ok(Value::Undefined)
    }

    /// Literal floats still have to respect the non-finite rules; an
    /// overflowed literal such as `1e999` is only legal when `infinity`
    /// is configured.
    fn evaluate_literal(&self, value: &Value, span: Option<Span>) -> Result<Value, FangError> {
        if let Value::Float(f) = value {
            return operations::guard_float(*f, &self.config, span);
        }
        Ok(value.clone())
    }
}
