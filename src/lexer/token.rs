/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * File:      token.rs
 * Purpose:   Defines the fundamental lexical token types used by the FANG
 *            engine during the lexing and parsing stages.
 *
 * Author:    Sam Wilcox
 * Email:     sam@fang-lang.com
 * Website:   https://www.fang-lang.com
 * GitHub:    https://github.com/samwilcox/fang
 *
 * License:
 * This file is part of the FANG scripting language project.
 *
 * FANG is dual-licensed under the terms of:
 *   - The MIT License
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

use crate::span::Span;

/// Represents the **category of a lexical token** in the FANG language.
///
/// `TokenKind` identifies how a sequence of characters from the source
/// code should be interpreted by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A numeric literal.
    ///
    /// Whether it is an `Int` or a `Float` is decided later from the
    /// lexeme: the presence of `.`, `e` or `E` makes it a float.
    Number,

    /// A quoted string literal. The lexeme holds the *decoded* text with
    /// all escape sequences already resolved.
    String,

    /// A user-defined name: variables, functions, block keys, and the
    /// standard-library method names (those are resolved at call time,
    /// not reserved).
    Identifier,

    /// A reserved FANG keyword (`and`, `not`, `return`, `true`, …).
    ///
    /// Keyword detection is handled by `keywords.rs`.
    Keyword,

    /// A symbolic operator: `.` `(` `)` `[` `]` `{` `}` and the one- or
    /// two-character assignment/comparison/arithmetic operators.
    Operator,

    /// A statement terminator: newline, `;`, or `,`. All three are
    /// interchangeable separators; the parser also accepts them between
    /// array elements and block entries.
    Terminator,

    /// End-of-source marker, emitted exactly once.
    Eof,
}

/// A single classified token produced by the lexer.
#[derive(Debug, Clone)]
pub struct Token {
    /// The classified category of the token.
    pub kind: TokenKind,

    /// The token's text. For `String` tokens this is the decoded value;
    /// for everything else it is the exact source text.
    pub lexeme: String,

    /// The 1-based source position where this token started.
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// True for the terminators that end a statement, including EOF.
    pub fn ends_statement(&self) -> bool {
        matches!(self.kind, TokenKind::Terminator | TokenKind::Eof)
    }

    /// True when this token is the given operator.
    pub fn is_operator(&self, text: &str) -> bool {
        self.kind == TokenKind::Operator && self.lexeme == text
    }

    /// True when this token is the given keyword.
    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == text
    }
}

impl fmt::Display for Token {
    /// Prints only the token's lexeme; error messages care about what the
    /// user wrote, not the internal structure.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Terminator if self.lexeme == "\n" => write!(f, "newline"),
            _ => write!(f, "{}", self.lexeme),
        }
    }
}
