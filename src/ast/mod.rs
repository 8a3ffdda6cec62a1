/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * AST Node Definitions
 * --------------------
 * The tagged node hierarchy shared by the parser and the evaluator. The
 * parser produces a `Vec<Node>` (one per statement); the evaluator walks
 * the same nodes against an Environment.
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

use std::fmt;
use std::rc::Rc;

use crate::span::Span;
use crate::value::Value;

/// How a braced statement sequence behaves when evaluated.
///
/// The three function types run with a dedicated `_return` slot; a
/// `LexicalBlock` is just a scoped statement sequence. A
/// `ClassConstructor` keeps its environment alive after evaluation; that
/// environment becomes the instance's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    AnonymousFunction,
    PureFunction,
    ClassConstructor,
    LexicalBlock,
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockType::AnonymousFunction => "anonymous function",
            BlockType::PureFunction => "function",
            BlockType::ClassConstructor => "class constructor",
            BlockType::LexicalBlock => "block",
        };
        write!(f, "{}", name)
    }
}

/// Declaration-site marker on a formal parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamModifier {
    /// Plain parameter: the argument is evaluated and, when composite,
    /// deep-copied before binding.
    None,

    /// `function x`: the argument arrives as its unevaluated expression.
    Function,

    /// `reference x`: composite arguments keep their identity, so
    /// mutations inside the function are visible to the caller.
    Reference,
}

/// A formal parameter of a function definition.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub modifier: ParamModifier,
}

impl Parameter {
    pub fn new(name: impl Into<String>, modifier: ParamModifier) -> Self {
        Self {
            name: name.into(),
            modifier,
        }
    }
}

/// A function definition: name, formals, and the body block.
///
/// Shared behind `Rc` so that a registered function, its closures, and any
/// reference copies all point at the single definition (function equality
/// is identity of this allocation).
#[derive(Debug)]
pub struct Callee {
    pub name: String,
    pub params: Vec<Parameter>,

    /// Always a `Node::Block` with a function-typed `BlockType`.
    pub body: Node,

    pub span: Option<Span>,
}

/// The desugared loop structure every looping builtin lowers to.
///
/// `initial` runs once on entry and `continuous` on every later
/// iteration; in both cases the *last* expression's truthiness decides
/// whether the body runs (an empty list means "always"). When `iterator`
/// is present the loop instead walks a deep copy of the collection,
/// binding each element to the name in `each`.
#[derive(Debug, Clone)]
pub struct LoopNode {
    /// The builtin that produced this loop ("for", "while", "do"), used
    /// in error messages.
    pub label: String,

    pub initial: Vec<Node>,
    pub continuous: Vec<Node>,
    pub statements: Vec<Node>,

    pub each: Option<String>,
    pub iterator: Option<Node>,

    pub span: Option<Span>,
}

/// A single AST node. Statements and expressions share this hierarchy.
#[derive(Debug, Clone)]
pub enum Node {
    /// A scalar literal (number, string, boolean, null), already parsed
    /// into its runtime value.
    Literal { value: Value, span: Option<Span> },

    /// A name reference. The special name `.` reads the implicit
    /// last-expression slot.
    Identifier { name: String, span: Option<Span> },

    /// `break` or `continue`.
    Keyword { name: String, span: Option<Span> },

    /// Placeholder where the grammar needs a node but the source has
    /// nothing (the left side of unary operators).
    Blank,

    /// `[e1, e2, …]`
    Array { elements: Vec<Node>, span: Option<Span> },

    /// A braced statement sequence; behavior depends on `block_type`.
    Block {
        block_type: BlockType,
        statements: Vec<Node>,
        span: Option<Span>,
    },

    /// `left op right`; unary operators use a `Blank` left side.
    Binary {
        left: Box<Node>,
        op: String,
        right: Box<Node>,
        span: Option<Span>,
    },

    /// A function definition statement. Evaluating it registers the
    /// function in the current environment.
    Callee(Rc<Callee>),

    /// `target(arg, …)` where target is an identifier or a member chain.
    Call {
        target: Box<Node>,
        args: Vec<Node>,
        span: Option<Span>,
    },

    /// A lowered loop (see [`LoopNode`]).
    Loop(Box<LoopNode>),

    /// A member chain read: `members[0]` yields the base value, each
    /// following member indexes into it.
    Get { members: Vec<Node>, span: Option<Span> },

    /// A member chain write with one of `= : := += -= *= /= %=`.
    Set {
        members: Vec<Node>,
        op: String,
        value: Box<Node>,
        span: Option<Span>,
    },

    /// `remove(chain)`: deletes the named leaf.
    Remove { members: Vec<Node>, span: Option<Span> },

    /// `return` / `return(value)`
    Return {
        value: Option<Box<Node>>,
        span: Option<Span>,
    },

    /// Host-supplied variable binding, normalized before the run.
    Injection {
        name: String,
        value: Value,
        span: Option<Span>,
    },

    /// Host-supplied bare value.
    Value { value: Value, span: Option<Span> },
}

impl Node {
    pub fn literal(value: Value, span: Span) -> Node {
        Node::Literal {
            value,
            span: Some(span),
        }
    }

    pub fn identifier(name: impl Into<String>, span: Span) -> Node {
        Node::Identifier {
            name: name.into(),
            span: Some(span),
        }
    }

    /// The source location attached to this node, when known.
    pub fn span(&self) -> Option<Span> {
        match self {
            Node::Literal { span, .. }
            | Node::Identifier { span, .. }
            | Node::Keyword { span, .. }
            | Node::Array { span, .. }
            | Node::Block { span, .. }
            | Node::Binary { span, .. }
            | Node::Call { span, .. }
            | Node::Get { span, .. }
            | Node::Set { span, .. }
            | Node::Remove { span, .. }
            | Node::Return { span, .. }
            | Node::Injection { span, .. }
            | Node::Value { span, .. } => *span,
            Node::Callee(callee) => callee.span,
            Node::Loop(lowered) => lowered.span,
            Node::Blank => None,
        }
    }

    /// Short description used for stack frames and error messages. Blocks
    /// report their block type so the frame stack can tell function
    /// bodies from plain blocks.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Literal { .. } => "literal",
            Node::Identifier { .. } => "identifier",
            Node::Keyword { .. } => "keyword",
            Node::Blank => "blank",
            Node::Array { .. } => "array",
            Node::Block {
                block_type: BlockType::AnonymousFunction,
                ..
            } => "anonymous function",
            Node::Block {
                block_type: BlockType::PureFunction,
                ..
            } => "function",
            Node::Block {
                block_type: BlockType::ClassConstructor,
                ..
            } => "class constructor",
            Node::Block {
                block_type: BlockType::LexicalBlock,
                ..
            } => "block",
            Node::Binary { .. } => "binary",
            Node::Callee(_) => "callee",
            Node::Call { .. } => "call",
            Node::Loop(_) => "loop",
            Node::Get { .. } => "get",
            Node::Set { .. } => "set",
            Node::Remove { .. } => "remove",
            Node::Return { .. } => "return",
            Node::Injection { .. } => "injection",
            Node::Value { .. } => "value",
        }
    }

    /// True for the function-typed blocks (the ones that own a `_return`
    /// slot when evaluated).
    pub fn is_function_block(&self) -> bool {
        matches!(
            self,
            Node::Block {
                block_type: BlockType::AnonymousFunction
                    | BlockType::PureFunction
                    | BlockType::ClassConstructor,
                ..
            }
        )
    }
}
