/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Parser Core & JSON Mode
 * -----------------------
 * The parser pulls tokens from the lexer on demand and produces the
 * statement sequence for a whole program. Script mode accepts the full
 * grammar (see statements.rs / expressions.rs); JSON-only mode accepts
 * exactly one value in JSON syntax (extended with unquoted object keys)
 * and rejects every imperative construct.
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

use std::collections::VecDeque;

use crate::ast::{BlockType, Node};
use crate::error::FangError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::value::Value;

pub struct Parser {
    pub(crate) lexer: Lexer,
    pub(crate) lookahead: VecDeque<Token>,
    pub(crate) json_only: bool,

    /// Depth of function bodies currently being parsed. A bare braced
    /// statement inside a function body is a lexical block; everywhere
    /// else braces build an anonymous-function block.
    pub(crate) function_depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: VecDeque::new(),
            json_only: false,
            function_depth: 0,
        }
    }

    pub fn json_only(mut self, enabled: bool) -> Self {
        self.json_only = enabled;
        self
    }

    /// Parses the whole source into a statement sequence.
    pub fn parse(mut self) -> Result<Vec<Node>, FangError> {
        if self.json_only {
            let document = self.parse_json_document()?;
            return Ok(vec![document]);
        }
        self.parse_program()
    }

    fn parse_program(&mut self) -> Result<Vec<Node>, FangError> {
        let mut statements = Vec::new();

        loop {
            self.skip_terminators()?;
            if self.at_end()? {
                return Ok(statements);
            }

            let statement = self.statement()?;
            let closed = Self::brace_terminated(&statement);
            statements.push(statement);

            if !self.peek()?.ends_statement() && !closed {
                return Err(self.unexpected("after statement"));
            }
        }
    }

    /// A statement that ends in `}` (a function definition, a braced
    /// block, or a call with a juxtaposed block body) does not need an
    /// explicit terminator after it.
    pub(crate) fn brace_terminated(statement: &Node) -> bool {
        match statement {
            Node::Callee(_) | Node::Block { .. } => true,
            Node::Set { value, .. } => Self::brace_terminated(value),
            Node::Call { args, .. } => matches!(args.last(), Some(Node::Block { .. })),
            _ => false,
        }
    }

    /// Converts a Number token's lexeme into its runtime value. The
    /// presence of `.`, `e` or `E` makes it a float; integers too large
    /// for 64 bits fall back to float as well.
    pub(crate) fn number_value(token: &Token) -> Value {
        let text = token.lexeme.as_str();
        if text.contains(['.', 'e', 'E']) {
            Value::Float(text.parse::<f64>().unwrap_or(f64::NAN))
        } else {
            match text.parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) => Value::Float(text.parse::<f64>().unwrap_or(f64::NAN)),
            }
        }
    }

    // -----------------------------------------------------------------
    // JSON-only mode
    // -----------------------------------------------------------------

    fn parse_json_document(&mut self) -> Result<Node, FangError> {
        self.skip_terminators()?;
        let value = self.json_value()?;
        self.skip_terminators()?;

        if !self.at_end()? {
            return Err(self.unexpected("after the JSON document (a document is a single value)"));
        }
        Ok(value)
    }

    fn json_value(&mut self) -> Result<Node, FangError> {
        let token = self.peek()?.clone();

        match token.kind {
            TokenKind::Number => {
                self.next()?;
                Ok(Node::literal(Self::number_value(&token), token.span))
            }

            TokenKind::String => {
                self.next()?;
                Ok(Node::literal(Value::String(token.lexeme), token.span))
            }

            TokenKind::Keyword => match token.lexeme.as_str() {
                "true" => {
                    self.next()?;
                    Ok(Node::literal(Value::Bool(true), token.span))
                }
                "false" => {
                    self.next()?;
                    Ok(Node::literal(Value::Bool(false), token.span))
                }
                "null" => {
                    self.next()?;
                    Ok(Node::literal(Value::Null, token.span))
                }
                _ => Err(self.unexpected("in JSON-only mode")),
            },

            TokenKind::Operator => match token.lexeme.as_str() {
                "{" => self.json_block(),
                "[" => self.json_array(),
                // JSON numbers may carry a leading minus.
                "-" => {
                    self.next()?;
                    let number = self.peek()?.clone();
                    if number.kind != TokenKind::Number {
                        return Err(self.unexpected("after '-' in JSON-only mode"));
                    }
                    self.next()?;
                    let value = match Self::number_value(&number) {
                        Value::Int(n) => Value::Int(-n),
                        Value::Float(n) => Value::Float(-n),
                        other => other,
                    };
                    Ok(Node::literal(value, token.span))
                }
                _ => Err(self.unexpected("in JSON-only mode")),
            },

            _ => Err(self.unexpected("in JSON-only mode")),
        }
    }

    fn json_block(&mut self) -> Result<Node, FangError> {
        let open = self.expect_operator("{")?;
        let mut entries = Vec::new();

        loop {
            self.skip_terminators()?;
            if self.match_operator("}")? {
                return Ok(Node::Block {
                    block_type: BlockType::AnonymousFunction,
                    statements: entries,
                    span: Some(open.span),
                });
            }
            if self.at_end()? {
                return Err(FangError::parse_error("mismatched bracket: expected '}'", Some(open.span)));
            }

            let key = self.peek()?.clone();
            let key_node = match key.kind {
                TokenKind::String | TokenKind::Identifier => {
                    self.next()?;
                    Node::literal(Value::String(key.lexeme), key.span)
                }
                _ => return Err(self.unexpected("as an object key in JSON-only mode")),
            };

            if !self.match_operator(":")? {
                return Err(FangError::parse_error(
                    "missing ':' in block literal",
                    Some(self.position()?),
                ));
            }
            self.skip_newlines()?;

            let value = self.json_value()?;
            entries.push(Node::Set {
                members: vec![key_node],
                op: ":".to_string(),
                value: Box::new(value),
                span: Some(key.span),
            });

            self.skip_newlines()?;
            let after = self.peek()?;
            if !after.ends_statement() && !after.is_operator("}") {
                return Err(self.unexpected("between object entries"));
            }
        }
    }

    fn json_array(&mut self) -> Result<Node, FangError> {
        let open = self.expect_operator("[")?;
        let mut elements = Vec::new();

        loop {
            self.skip_terminators()?;
            if self.match_operator("]")? {
                return Ok(Node::Array {
                    elements,
                    span: Some(open.span),
                });
            }
            if self.at_end()? {
                return Err(FangError::parse_error("mismatched bracket: expected ']'", Some(open.span)));
            }

            elements.push(self.json_value()?);

            self.skip_newlines()?;
            let after = self.peek()?;
            if !after.ends_statement() && !after.is_operator("]") {
                return Err(self.unexpected("between array elements"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ParamModifier;

    fn parse(source: &str) -> Vec<Node> {
        Parser::new(source).parse().expect("parse failure")
    }

    fn parse_error(source: &str) -> FangError {
        Parser::new(source).parse().expect_err("expected a parse error")
    }

    fn parse_json(source: &str) -> Result<Vec<Node>, FangError> {
        Parser::new(source).json_only(true).parse()
    }

    #[test]
    fn statements_split_on_any_terminator() {
        let program = parse("a: 1, b: 2; c: 3\nd: 4");
        assert_eq!(program.len(), 4);
        assert!(matches!(program[0], Node::Set { .. }));
    }

    #[test]
    fn assignment_builds_member_chain() {
        let program = parse("a.b[2].c = 10");
        let Node::Set { members, op, .. } = &program[0] else {
            panic!("expected a set node");
        };
        assert_eq!(op, "=");
        assert_eq!(members.len(), 4);
        assert!(matches!(&members[0], Node::Identifier { name, .. } if name == "a"));
    }

    #[test]
    fn compound_assignment_operators() {
        for op in ["+=", "-=", "*=", "/=", "%=", ":", ":="] {
            let program = parse(&format!("x {} 1", op));
            let Node::Set { op: parsed, .. } = &program[0] else {
                panic!("expected a set node for {op}");
            };
            assert_eq!(parsed, op);
        }
    }

    #[test]
    fn assignment_to_non_place_is_rejected() {
        let err = parse_error("1 + 2 = 3");
        assert!(err.message.contains("assigned"), "{}", err.message);
    }

    #[test]
    fn integer_member_chain() {
        let program = parse("x = foo.10.bar");
        let Node::Set { value, .. } = &program[0] else {
            panic!("expected a set node");
        };
        let Node::Get { members, .. } = value.as_ref() else {
            panic!("expected a get chain");
        };
        assert_eq!(members.len(), 3);
        assert!(matches!(
            &members[1],
            Node::Literal { value: Value::Int(10), .. }
        ));
        assert!(matches!(
            &members[2],
            Node::Literal { value: Value::String(s), .. } if s == "bar"
        ));
    }

    #[test]
    fn call_arguments_may_be_assignments() {
        let program = parse("for(i = 0, i < 9, i += 1, {x += i})");
        let Node::Call { target, args, .. } = &program[0] else {
            panic!("expected a call");
        };
        assert!(matches!(target.as_ref(), Node::Identifier { name, .. } if name == "for"));
        assert_eq!(args.len(), 4);
        assert!(matches!(&args[0], Node::Set { .. }));
        assert!(matches!(&args[3], Node::Block { .. }));
    }

    #[test]
    fn function_definition_with_modifiers() {
        let program = parse("function f(a, reference b, function c) { return(a) }");
        let Node::Callee(callee) = &program[0] else {
            panic!("expected a function definition");
        };
        assert_eq!(callee.name, "f");
        assert_eq!(callee.params.len(), 3);
        assert_eq!(callee.params[0].modifier, ParamModifier::None);
        assert_eq!(callee.params[1].modifier, ParamModifier::Reference);
        assert_eq!(callee.params[2].modifier, ParamModifier::Function);
        assert!(matches!(
            &callee.body,
            Node::Block { block_type: BlockType::PureFunction, .. }
        ));
    }

    #[test]
    fn braces_in_expression_position_are_anonymous_blocks() {
        let program = parse("x = {a: 1, b: 2}");
        let Node::Set { value, .. } = &program[0] else {
            panic!("expected a set node");
        };
        assert!(matches!(
            value.as_ref(),
            Node::Block { block_type: BlockType::AnonymousFunction, .. }
        ));
    }

    #[test]
    fn bare_braces_inside_function_bodies_are_lexical() {
        let program = parse("function f() { {a: 1} }");
        let Node::Callee(callee) = &program[0] else {
            panic!("expected a function definition");
        };
        let Node::Block { statements, .. } = &callee.body else {
            panic!("expected a body block");
        };
        assert!(matches!(
            &statements[0],
            Node::Block { block_type: BlockType::LexicalBlock, .. }
        ));
    }

    #[test]
    fn remove_statement_form() {
        let program = parse("remove(a.b)");
        let Node::Remove { members, .. } = &program[0] else {
            panic!("expected a remove node");
        };
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn return_with_and_without_value() {
        let program = parse("return(1 + 2)\nreturn");
        assert!(matches!(&program[0], Node::Return { value: Some(_), .. }));
        assert!(matches!(&program[1], Node::Return { value: None, .. }));
    }

    #[test]
    fn mismatched_bracket() {
        let err = parse_error("x = [1, 2");
        assert!(err.message.contains("']'"), "{}", err.message);
    }

    #[test]
    fn json_mode_accepts_documents() {
        assert!(parse_json(r#"{"a": 3, "b": [2, 1]}"#).is_ok());
        assert!(parse_json("{a: 3, b: {c: null}}").is_ok());
        assert!(parse_json("[1, -2.5, true]").is_ok());
        assert!(parse_json("42").is_ok());
    }

    #[test]
    fn json_mode_rejects_imperative_constructs() {
        assert!(parse_json("a = 3").is_err());
        assert!(parse_json("{a: 1 + 2}").is_err());
        assert!(parse_json("print(1)").is_err());
        assert!(parse_json("{a: 1} {b: 2}").is_err());
    }

    #[test]
    fn json_mode_requires_colon() {
        let err = parse_json("{a 1}").expect_err("expected an error");
        assert!(err.message.contains(":"), "{}", err.message);
    }
}
