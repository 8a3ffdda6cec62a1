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

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::span::Span;

/// Process-wide counter feeding the per-error correlation tag.
static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

/// Which stage of the pipeline raised the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Eval,
}

#[derive(Debug, Clone)]
pub struct FangError {
    /// Which stage raised the error.
    pub kind: ErrorKind,

    /// Human-readable error message
    pub message: String,

    /// Primary source location, when known
    pub span: Option<Span>,

    /// Optional note / help text
    pub help: Option<String>,

    /// Unique tag for log correlation (`#NNNN` in diagnostics output)
    pub tag: u64,
}

impl FangError {
    /// Generic constructor
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            help: None,
            tag: NEXT_TAG.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Lexical error (during tokenization)
    pub fn lex_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Lex, message, Some(span))
    }

    /// Syntax error (during parsing)
    pub fn parse_error(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(ErrorKind::Parse, message, span)
    }

    /// Runtime error (during evaluation)
    pub fn eval_error(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(ErrorKind::Eval, message, span)
    }

    /// Stable error code (E_LEX, E_PARSE, E_EVAL)
    pub fn code(&self) -> &'static str {
        match self.kind {
            ErrorKind::Lex => "E_LEX",
            ErrorKind::Parse => "E_PARSE",
            ErrorKind::Eval => "E_EVAL",
        }
    }

    /// Attach a help message to the error (builder-style).
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attach a source location if the error does not have one yet.
    pub fn or_span(mut self, span: Option<Span>) -> Self {
        if self.span.is_none() {
            self.span = span;
        }
        self
    }
}

impl fmt::Display for FangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "[{}] {} ({})", self.code(), self.message, span),
            None => write!(f, "[{}] {}", self.code(), self.message),
        }
    }
}

impl std::error::Error for FangError {}
