/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Parser Token Utilities
 * ----------------------
 * Lookahead, matching and expectation helpers shared by the statement and
 * expression parsers. The parser pulls tokens from the lexer one at a time
 * and keeps a small pushback buffer for the two-token peeks the grammar
 * needs (member access after integers, parameter modifiers).
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

use crate::error::FangError;
use crate::lexer::{Token, TokenKind};
use crate::parser::parser::Parser;
use crate::span::Span;

impl Parser {
    /// Fills the lookahead buffer up to `depth + 1` tokens and returns a
    /// reference to the token at `depth`.
    pub(crate) fn peek_at(&mut self, depth: usize) -> Result<&Token, FangError> {
        while self.lookahead.len() <= depth {
            let token = self.lexer.next_token()?;
            self.lookahead.push_back(token);
        }
        Ok(&self.lookahead[depth])
    }

    pub(crate) fn peek(&mut self) -> Result<&Token, FangError> {
        self.peek_at(0)
    }

    /// Consumes and returns the next token.
    pub(crate) fn next(&mut self) -> Result<Token, FangError> {
        self.peek()?;
        Ok(self.lookahead.pop_front().expect("lookahead filled by peek"))
    }

    /// The source position of the upcoming token.
    pub(crate) fn position(&mut self) -> Result<Span, FangError> {
        Ok(self.peek()?.span)
    }

    pub(crate) fn at_end(&mut self) -> Result<bool, FangError> {
        Ok(self.peek()?.kind == TokenKind::Eof)
    }

    pub(crate) fn check_operator(&mut self, text: &str) -> Result<bool, FangError> {
        Ok(self.peek()?.is_operator(text))
    }

    pub(crate) fn check_keyword(&mut self, text: &str) -> Result<bool, FangError> {
        Ok(self.peek()?.is_keyword(text))
    }

    /// Consumes the upcoming token when it is the given operator.
    pub(crate) fn match_operator(&mut self, text: &str) -> Result<bool, FangError> {
        if self.check_operator(text)? {
            self.next()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Consumes the upcoming token when it is the given keyword.
    pub(crate) fn match_keyword(&mut self, text: &str) -> Result<bool, FangError> {
        if self.check_keyword(text)? {
            self.next()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Consumes the upcoming token, which must be the given operator.
    pub(crate) fn expect_operator(&mut self, text: &str) -> Result<Token, FangError> {
        let token = self.peek()?;
        if token.is_operator(text) {
            return self.next();
        }
        let message = format!("expected '{}' but found '{}'", text, token);
        let span = token.span;
        Err(FangError::parse_error(message, Some(span)))
    }

    /// Consumes the upcoming token, which must be an identifier, and
    /// returns it.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Result<Token, FangError> {
        let token = self.peek()?;
        if token.kind == TokenKind::Identifier {
            return self.next();
        }
        let message = format!("expected {} but found '{}'", what, token);
        let span = token.span;
        Err(FangError::parse_error(message, Some(span)))
    }

    /// Consumes any run of terminators (newline, `;`, `,`).
    pub(crate) fn skip_terminators(&mut self) -> Result<(), FangError> {
        while self.peek()?.kind == TokenKind::Terminator {
            self.next()?;
        }
        Ok(())
    }

    /// Consumes any run of newline terminators only. Used inside
    /// parentheses and brackets where `,`/`;` are separators with meaning.
    pub(crate) fn skip_newlines(&mut self) -> Result<(), FangError> {
        loop {
            let token = self.peek()?;
            if token.kind == TokenKind::Terminator && token.lexeme == "\n" {
                self.next()?;
            } else {
                return Ok(());
            }
        }
    }

    /// Error for a token that no grammar rule accepts.
    pub(crate) fn unexpected(&mut self, context: &str) -> FangError {
        match self.peek() {
            Ok(token) => {
                let message = format!("unexpected token '{}' {}", token, context);
                let span = token.span;
                FangError::parse_error(message, Some(span))
            }
            Err(err) => err,
        }
    }
}
