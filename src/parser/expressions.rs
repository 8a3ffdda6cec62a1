/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Expression Parsing
 * ------------------
 * Recursive-descent expression grammar. Parsing order follows strict
 * precedence, low to high:
 *
 *   or → and → equality (== != in) → comparison (< <= > >=)
 *      → additive (+ -) → multiplicative (* / %) → unary (not - +)
 *      → postfix (.member, [index], (call)) → primary
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

use crate::ast::{BlockType, Node};
use crate::error::FangError;
use crate::lexer::TokenKind;
use crate::parser::parser::Parser;
use crate::value::Value;

impl Parser {
    pub(crate) fn expression(&mut self) -> Result<Node, FangError> {
        self.or_expression()
    }

    fn or_expression(&mut self) -> Result<Node, FangError> {
        let mut expr = self.and_expression()?;

        while self.check_keyword("or")? {
            let op = self.next()?;
            self.skip_newlines()?;
            let right = self.and_expression()?;
            expr = Node::Binary {
                left: Box::new(expr),
                op: op.lexeme,
                right: Box::new(right),
                span: Some(op.span),
            };
        }

        Ok(expr)
    }

    fn and_expression(&mut self) -> Result<Node, FangError> {
        let mut expr = self.equality()?;

        while self.check_keyword("and")? {
            let op = self.next()?;
            self.skip_newlines()?;
            let right = self.equality()?;
            expr = Node::Binary {
                left: Box::new(expr),
                op: op.lexeme,
                right: Box::new(right),
                span: Some(op.span),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Node, FangError> {
        let mut expr = self.comparison()?;

        while self.check_operator("==")?
            || self.check_operator("!=")?
            || self.check_keyword("in")?
        {
            let op = self.next()?;
            self.skip_newlines()?;
            let right = self.comparison()?;
            expr = Node::Binary {
                left: Box::new(expr),
                op: op.lexeme,
                right: Box::new(right),
                span: Some(op.span),
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Node, FangError> {
        let mut expr = self.additive()?;

        while self.check_operator("<")?
            || self.check_operator("<=")?
            || self.check_operator(">")?
            || self.check_operator(">=")?
        {
            let op = self.next()?;
            self.skip_newlines()?;
            let right = self.additive()?;
            expr = Node::Binary {
                left: Box::new(expr),
                op: op.lexeme,
                right: Box::new(right),
                span: Some(op.span),
            };
        }

        Ok(expr)
    }

    fn additive(&mut self) -> Result<Node, FangError> {
        let mut expr = self.multiplicative()?;

        while self.check_operator("+")? || self.check_operator("-")? {
            let op = self.next()?;
            self.skip_newlines()?;
            let right = self.multiplicative()?;
            expr = Node::Binary {
                left: Box::new(expr),
                op: op.lexeme,
                right: Box::new(right),
                span: Some(op.span),
            };
        }

        Ok(expr)
    }

    fn multiplicative(&mut self) -> Result<Node, FangError> {
        let mut expr = self.unary()?;

        while self.check_operator("*")? || self.check_operator("/")? || self.check_operator("%")? {
            let op = self.next()?;
            self.skip_newlines()?;
            let right = self.unary()?;
            expr = Node::Binary {
                left: Box::new(expr),
                op: op.lexeme,
                right: Box::new(right),
                span: Some(op.span),
            };
        }

        Ok(expr)
    }

    /// `not x`, `-x`, `+x`. A minus directly on a numeric literal folds
    /// into a negative literal.
    fn unary(&mut self) -> Result<Node, FangError> {
        if self.check_keyword("not")? {
            let op = self.next()?;
            let right = self.unary()?;
            return Ok(Node::Binary {
                left: Box::new(Node::Blank),
                op: op.lexeme,
                right: Box::new(right),
                span: Some(op.span),
            });
        }

        if self.check_operator("-")? || self.check_operator("+")? {
            let op = self.next()?;
            let right = self.unary()?;

            if op.lexeme == "-" {
                if let Node::Literal {
                    value: Value::Int(n),
                    ..
                } = right
                {
                    return Ok(Node::literal(Value::Int(-n), op.span));
                }
                if let Node::Literal {
                    value: Value::Float(n),
                    ..
                } = right
                {
                    return Ok(Node::literal(Value::Float(-n), op.span));
                }
            }

            return Ok(Node::Binary {
                left: Box::new(Node::Blank),
                op: op.lexeme,
                right: Box::new(right),
                span: Some(op.span),
            });
        }

        self.postfix()
    }

    /// Member access, indexing and calls, left to right:
    /// `base.member`, `base[index]`, `target(args)`.
    fn postfix(&mut self) -> Result<Node, FangError> {
        let mut expr = self.primary()?;

        loop {
            if self.check_operator(".")? {
                let dot = self.next()?;
                let member = self.member_after_dot()?;
                expr = Self::extend_chain(expr, member, dot.span);
                continue;
            }

            if self.check_operator("[")? {
                let open = self.next()?;
                self.skip_newlines()?;
                let index = self.expression()?;
                self.skip_newlines()?;
                if !self.match_operator("]")? {
                    return Err(FangError::parse_error(
                        "mismatched bracket: expected ']'",
                        Some(open.span),
                    ));
                }
                expr = Self::extend_chain(expr, index, open.span);
                continue;
            }

            if self.check_operator("(")? {
                let open = self.next()?;
                let mut args = self.call_arguments(open.span)?;

                // A brace block juxtaposed right after the closing paren
                // is one more argument: `for(v in x) { … }`.
                if self.check_operator("{")? {
                    let brace = self.next()?;
                    args.push(self.block_body(BlockType::AnonymousFunction, brace.span)?);
                }

                let span = expr.span().or(Some(open.span));
                expr = Node::Call {
                    target: Box::new(expr),
                    args,
                    span,
                };
                continue;
            }

            return Ok(expr);
        }
    }

    /// The token after `.` is a member name or an integer key, so
    /// `foo.10.bar` reads entry 10 of `foo` and then member `bar`.
    fn member_after_dot(&mut self) -> Result<Node, FangError> {
        let token = self.peek()?.clone();

        match token.kind {
            TokenKind::Identifier => {
                self.next()?;
                Ok(Node::literal(Value::String(token.lexeme), token.span))
            }
            TokenKind::Number => {
                self.next()?;
                match Parser::number_value(&token) {
                    value @ Value::Int(_) => Ok(Node::literal(value, token.span)),
                    _ => Err(FangError::parse_error(
                        "member access needs a name or an integer",
                        Some(token.span),
                    )),
                }
            }
            _ => Err(self.unexpected("after '.'")),
        }
    }

    /// Appends `member` to an existing chain, or starts a new one.
    fn extend_chain(expr: Node, member: Node, span: crate::span::Span) -> Node {
        match expr {
            Node::Get { mut members, span } => {
                members.push(member);
                Node::Get { members, span }
            }
            base => {
                let span = base.span().or(Some(span));
                Node::Get {
                    members: vec![base, member],
                    span,
                }
            }
        }
    }

    /// Arguments of a call. Any terminator separates arguments, and each
    /// argument may be a full statement; the looping builtins take
    /// assignments such as `for(i = 0, i < 9, i += 1, { … })`.
    fn call_arguments(&mut self, open: crate::span::Span) -> Result<Vec<Node>, FangError> {
        let mut args = Vec::new();

        loop {
            self.skip_terminators()?;
            if self.match_operator(")")? {
                return Ok(args);
            }
            if self.at_end()? {
                return Err(FangError::parse_error(
                    "mismatched bracket: expected ')'",
                    Some(open),
                ));
            }

            args.push(self.expression_statement()?);

            let after = self.peek()?;
            if !after.ends_statement() && !after.is_operator(")") {
                return Err(self.unexpected("in the argument list"));
            }
        }
    }

    fn primary(&mut self) -> Result<Node, FangError> {
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

            TokenKind::Identifier => {
                self.next()?;
                Ok(Node::identifier(token.lexeme, token.span))
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
                "function" => self.function_expression(),
                _ => Err(self.unexpected("in an expression")),
            },

            TokenKind::Operator => match token.lexeme.as_str() {
                "(" => {
                    let open = self.next()?;
                    self.skip_newlines()?;
                    let expr = self.expression()?;
                    self.skip_newlines()?;
                    if !self.match_operator(")")? {
                        return Err(FangError::parse_error(
                            "mismatched bracket: expected ')'",
                            Some(open.span),
                        ));
                    }
                    Ok(expr)
                }
                "[" => self.array_literal(),
                "{" => {
                    let open = self.next()?;
                    self.block_body(BlockType::AnonymousFunction, open.span)
                }
                _ => Err(self.unexpected("in an expression")),
            },

            _ => Err(self.unexpected("in an expression")),
        }
    }

    fn array_literal(&mut self) -> Result<Node, FangError> {
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
                return Err(FangError::parse_error(
                    "mismatched bracket: expected ']'",
                    Some(open.span),
                ));
            }

            elements.push(self.expression()?);

            let after = self.peek()?;
            if !after.ends_statement() && !after.is_operator("]") {
                return Err(self.unexpected("between array elements"));
            }
        }
    }
}
