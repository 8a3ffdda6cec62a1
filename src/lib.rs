/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
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

//! FANG is an embeddable interpreter for a small dynamically-typed
//! scripting language that is a strict superset of JSON: every JSON
//! document is a valid FANG value, and on top of that the language adds
//! unquoted keys, bare statements, assignment, control flow, functions
//! and persistent instances.
//!
//! ```
//! use fang::{Config, Engine, Value};
//!
//! let engine = Engine::new(Config::default());
//! let result = engine.run("a: 3, b: 2, return(a + b)").unwrap();
//! assert_eq!(result, Value::Int(5));
//! ```

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod globals;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod value;

pub use config::Config;
pub use error::{ErrorKind, FangError};
pub use interpreter::Interpreter;
pub use span::Span;
pub use value::Value;

use ast::{BlockType, Node};
use diagnostics::DiagnosticPrinter;
use environment::EnvRef;

/// A parsed program: reusable across runs and instances.
pub struct Parsed {
    statements: Vec<Node>,
    source: String,
    origin: String,
}

impl Parsed {
    pub fn statements(&self) -> &[Node] {
        &self.statements
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Parses source text into a reusable program. The optional `origin` tag
/// names the script in diagnostics; the configuration selects JSON-only
/// mode and stderr reporting.
pub fn parse(
    source: &str,
    origin: Option<&str>,
    config: Option<&Config>,
) -> Result<Parsed, FangError> {
    let config = config.cloned().unwrap_or_default();
    let origin = origin.unwrap_or("<script>").to_string();

    match parser::Parser::new(source).json_only(config.json_only).parse() {
        Ok(statements) => Ok(Parsed {
            statements,
            source: source.to_string(),
            origin,
        }),
        Err(error) => {
            report(&config, &origin, source, &error);
            Err(error)
        }
    }
}

/// Evaluates a parsed program and returns its result value.
pub fn evaluate_parsed(parsed: &Parsed, config: Option<&Config>) -> Result<Value, FangError> {
    evaluate_with(parsed, &[], config)
}

/// Evaluates a parsed program with host-provided variables bound before
/// the first statement runs. Values are normalized and deep-copied on
/// the way in; the host document is never shared.
pub fn evaluate_with(
    parsed: &Parsed,
    variables: &[(&str, Value)],
    config: Option<&Config>,
) -> Result<Value, FangError> {
    let config = config.cloned().unwrap_or_default();
    let mut interpreter = Interpreter::new(config.clone());

    let result = inject(&mut interpreter, variables).and_then(|_| {
        interpreter.run_program(&parsed.statements, BlockType::AnonymousFunction)
    });

    let result = result.map(undefined_to_null);
    if let Err(error) = &result {
        report(&config, &parsed.origin, &parsed.source, error);
    }
    result
}

/// Builds a persistent instance: the program runs as a class constructor
/// and its environment, variables and functions alike, survives as the
/// instance state.
pub fn make_instance(parsed: &Parsed, config: Option<&Config>) -> Result<Instance, FangError> {
    let config = config.cloned().unwrap_or_default();
    let mut interpreter = Interpreter::new(config.clone());

    // A program that is a single block literal (a JSON document)
    // constructs from the block's own entries, so its keys become the
    // instance state.
    let statements: &[Node] = match parsed.statements.as_slice() {
        [Node::Block {
            block_type: BlockType::AnonymousFunction,
            statements,
            ..
        }] => statements,
        all => all,
    };

    match interpreter.run_program(statements, BlockType::ClassConstructor) {
        Ok(_) => Ok(Instance {
            env: interpreter.environment(),
            config,
            source: parsed.source.clone(),
            origin: parsed.origin.clone(),
        }),
        Err(error) => {
            report(&config, &parsed.origin, &parsed.source, &error);
            Err(error)
        }
    }
}

/// A constructed instance: a retained environment plus the configuration
/// it was built with.
#[derive(Debug)]
pub struct Instance {
    env: EnvRef,
    config: Config,
    source: String,
    origin: String,
}

impl Instance {
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, FangError> {
        invoke_on_instance(self, name, args)
    }

    pub fn get(&self, path: &[Value]) -> Result<Value, FangError> {
        get_member(self, path)
    }
}

/// Calls a function stored in the instance with host-supplied argument
/// values. Each call runs on a fresh interpreter whose enclosing scope
/// is the instance environment, so member reads and writes persist
/// across calls while an aborted call leaves no temporary scopes or
/// stack frames behind.
pub fn invoke_on_instance(
    instance: &Instance,
    name: &str,
    args: &[Value],
) -> Result<Value, FangError> {
    let mut interpreter =
        Interpreter::with_enclosing(instance.config.clone(), instance.env.clone());

    let target = instance.env.borrow().get(name);
    let result = match target {
        Value::Function(func) => {
            let arg_nodes: Vec<Node> = args
                .iter()
                .map(|value| Node::Value {
                    value: value.clone(),
                    span: None,
                })
                .collect();
            interpreter.call_function(&func, &arg_nodes, None)
        }

        Value::Undefined => Err(FangError::eval_error(
            format!("the instance has no function '{}'", name),
            None,
        )),

        other => Err(FangError::eval_error(
            format!("'{}' is not a function (it is {})", name, other.type_name()),
            None,
        )),
    };

    let result = result.map(undefined_to_null);
    if let Err(error) = &result {
        report(&instance.config, &instance.origin, &instance.source, error);
    }
    result
}

/// Reads a member from the instance state: `path` is a sequence of
/// string keys and integer indexes equivalent to `foo.bar[3].baz`. A
/// missing member reads as null.
pub fn get_member(instance: &Instance, path: &[Value]) -> Result<Value, FangError> {
    let Some((first, rest)) = path.split_first() else {
        return Err(FangError::eval_error("the member path is empty", None));
    };

    let Value::String(name) = first else {
        return Err(FangError::eval_error(
            "a member path starts with a name",
            None,
        ));
    };

    let mut current = instance.env.borrow().get(name);
    if current.is_undefined() {
        return Ok(Value::Null);
    }

    for key in rest {
        if matches!(current, Value::Null) {
            return Ok(Value::Null);
        }
        match interpreter::expressions::index_value(&current, key, None)? {
            Some(next) => current = next,
            None => return Ok(Value::Null),
        }
    }

    Ok(undefined_to_null(current))
}

/// The convenience entry for the common embedding path: one configuration,
/// parse + evaluate in a single call.
pub struct Engine {
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses and evaluates `source` in one step.
    pub fn run(&self, source: &str) -> Result<Value, FangError> {
        let parsed = parse(source, None, Some(&self.config))?;
        evaluate_parsed(&parsed, Some(&self.config))
    }

    /// Like [`Engine::run`], with host variables bound first.
    pub fn run_with(&self, source: &str, variables: &[(&str, Value)]) -> Result<Value, FangError> {
        let parsed = parse(source, None, Some(&self.config))?;
        evaluate_with(&parsed, variables, Some(&self.config))
    }
}

fn inject(interpreter: &mut Interpreter, variables: &[(&str, Value)]) -> Result<(), FangError> {
    for (name, value) in variables {
        let injection = Node::Injection {
            name: name.to_string(),
            value: value.clone(),
            span: None,
        };
        interpreter.evaluate(&injection)?;
    }
    Ok(())
}

/// The internal sentinels, "no value" and deferred expressions, never
/// cross the API boundary.
fn undefined_to_null(value: Value) -> Value {
    match value {
        Value::Undefined | Value::Expr(_) => Value::Null,
        other => other,
    }
}

fn report(config: &Config, origin: &str, source: &str, error: &FangError) {
    if config.stderr_enabled {
        DiagnosticPrinter::new(origin, source).print(error);
    }
}
