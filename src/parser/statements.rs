/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Statement Parsing
 * -----------------
 * Statement-level grammar: assignments through member chains, function
 * definitions, `return` / `break` / `continue`, the `remove(…)` form, and
 * braced statement blocks. Expressions are handled in expressions.rs.
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

use crate::ast::{BlockType, Callee, Node, ParamModifier, Parameter};
use crate::error::FangError;
use crate::lexer::TokenKind;
use crate::parser::parser::Parser;
use crate::value::Value;

/// The operators that may follow a member chain to form an assignment.
const ASSIGNMENT_OPERATORS: [&str; 8] = ["=", ":", ":=", "+=", "-=", "*=", "/=", "%="];

impl Parser {
    pub(crate) fn statement(&mut self) -> Result<Node, FangError> {
        let token = self.peek()?.clone();

        if token.is_keyword("break") || token.is_keyword("continue") {
            self.next()?;
            return Ok(Node::Keyword {
                name: token.lexeme,
                span: Some(token.span),
            });
        }

        if token.is_keyword("return") {
            return self.return_statement();
        }

        // `function name(…) {…}`: a named definition statement. An
        // anonymous `function(…)` falls through to the expression parser.
        if token.is_keyword("function") && self.peek_at(1)?.kind == TokenKind::Identifier {
            return self.function_definition();
        }

        // A bare braced statement inside a function body scopes its
        // locals; everywhere else braces are an object-style expression.
        if token.is_operator("{") && self.function_depth > 0 {
            self.next()?;
            return self.block_body(BlockType::LexicalBlock, token.span);
        }

        self.expression_statement()
    }

    /// An expression, optionally completed into an assignment or the
    /// `remove(…)` statement form. Also used for call arguments, so the
    /// looping builtins receive `for(i = 0, i < 9, i += 1, {…})` intact.
    pub(crate) fn expression_statement(&mut self) -> Result<Node, FangError> {
        let expr = self.expression()?;

        let next = self.peek()?;
        let is_assignment = next.kind == TokenKind::Operator
            && ASSIGNMENT_OPERATORS.contains(&next.lexeme.as_str());

        if is_assignment {
            let op = self.next()?;
            self.skip_newlines()?;
            let value = self.expression()?;
            let members = Self::assignment_target(expr)?;
            return Ok(Node::Set {
                members,
                op: op.lexeme,
                value: Box::new(value),
                span: Some(op.span),
            });
        }

        // `remove(a.b[1])` parses as a call; rewrite it into the removal
        // statement unless the user has shadowed the name with a function.
        if let Node::Call { target, args, span } = &expr {
            if let Node::Identifier { name, .. } = target.as_ref() {
                if name == "remove" && args.len() == 1 {
                    let members = Self::assignment_target(args[0].clone())?;
                    return Ok(Node::Remove {
                        members,
                        span: *span,
                    });
                }
            }
        }

        Ok(expr)
    }

    /// Validates an expression as the left side of an assignment and
    /// flattens it into a member chain.
    fn assignment_target(node: Node) -> Result<Vec<Node>, FangError> {
        match node {
            Node::Identifier { .. } => Ok(vec![node]),
            Node::Get { members, .. } => Ok(members),
            // Quoted keys: `"a": 3` assigns the name a.
            Node::Literal {
                value: Value::String(_),
                ..
            } => Ok(vec![node]),
            other => Err(FangError::parse_error(
                "this expression cannot be assigned to",
                other.span(),
            )),
        }
    }

    fn return_statement(&mut self) -> Result<Node, FangError> {
        let keyword = self.next()?;

        let mut value = None;
        if self.match_operator("(")? {
            self.skip_newlines()?;
            if !self.check_operator(")")? {
                value = Some(Box::new(self.expression()?));
                self.skip_newlines()?;
            }
            self.expect_operator(")")?;
        }

        Ok(Node::Return {
            value,
            span: Some(keyword.span),
        })
    }

    /// `function name(params) { body }`
    fn function_definition(&mut self) -> Result<Node, FangError> {
        let keyword = self.next()?; // `function`
        let name = self.expect_identifier("a function name")?;
        self.callee(name.lexeme, BlockType::PureFunction, keyword.span)
    }

    /// `function(params) { body }` in expression position. Reused by the
    /// statement form above through `callee`.
    pub(crate) fn function_expression(&mut self) -> Result<Node, FangError> {
        let keyword = self.next()?; // `function`
        if self.peek()?.kind == TokenKind::Identifier {
            let name = self.next()?;
            return self.callee(name.lexeme, BlockType::PureFunction, keyword.span);
        }
        self.callee(String::new(), BlockType::AnonymousFunction, keyword.span)
    }

    fn callee(
        &mut self,
        name: String,
        block_type: BlockType,
        span: crate::span::Span,
    ) -> Result<Node, FangError> {
        self.expect_operator("(")?;
        let params = self.parameters()?;

        self.skip_newlines()?;
        let open = self.expect_operator("{")?;
        self.function_depth += 1;
        let body = self.block_body(block_type, open.span);
        self.function_depth -= 1;

        Ok(Node::Callee(Rc::new(Callee {
            name,
            params,
            body: body?,
            span: Some(span),
        })))
    }

    fn parameters(&mut self) -> Result<Vec<Parameter>, FangError> {
        let mut params = Vec::new();

        loop {
            self.skip_newlines()?;
            if self.match_operator(")")? {
                return Ok(params);
            }

            let modifier = if self.match_keyword("function")? {
                ParamModifier::Function
            } else if self.match_keyword("reference")? {
                ParamModifier::Reference
            } else {
                ParamModifier::None
            };

            let name = self.expect_identifier("a parameter name")?;
            params.push(Parameter::new(name.lexeme, modifier));

            self.skip_newlines()?;
            let after = self.peek()?;
            if after.kind == TokenKind::Terminator {
                self.next()?;
            } else if !after.is_operator(")") {
                return Err(self.unexpected("in the parameter list"));
            }
        }
    }

    /// Parses statements up to the closing `}`. The opening brace has
    /// already been consumed.
    pub(crate) fn block_body(
        &mut self,
        block_type: BlockType,
        span: crate::span::Span,
    ) -> Result<Node, FangError> {
        let mut statements = Vec::new();

        loop {
            self.skip_terminators()?;
            if self.match_operator("}")? {
                return Ok(Node::Block {
                    block_type,
                    statements,
                    span: Some(span),
                });
            }
            if self.at_end()? {
                return Err(FangError::parse_error(
                    "mismatched bracket: expected '}'",
                    Some(span),
                ));
            }

            let statement = self.statement()?;
            let closed = Self::brace_terminated(&statement);
            statements.push(statement);

            let after = self.peek()?;
            if !after.ends_statement() && !after.is_operator("}") && !closed {
                return Err(self.unexpected("after statement"));
            }
        }
    }
}
