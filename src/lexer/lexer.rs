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

use crate::error::FangError;
use crate::lexer::keywords::is_keyword;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// The FANG lexer: produces one classified token per `next_token` call.
///
/// Newlines are significant (they terminate statements), so only spaces,
/// tabs and carriage returns are skipped between tokens. Comments
/// (`# …`, `// …`, `/* … */`) are skipped like whitespace, except that a
/// line comment does not swallow the newline that ends it.
pub struct Lexer {
    chars: Vec<char>,
    current: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans and returns the next token from the source stream.
    ///
    /// Returns a token of kind `Eof` once the input is exhausted; calling
    /// again after that keeps returning `Eof`.
    pub fn next_token(&mut self) -> Result<Token, FangError> {
        self.skip_blanks_and_comments()?;

        let span = self.position();

        if self.is_at_end() {
            return Ok(Token::new(TokenKind::Eof, "", span));
        }

        let ch = self.advance();

        match ch {
            // Statement terminators. Newline is a token of its own; the
            // parser treats all three interchangeably.
            '\n' => Ok(Token::new(TokenKind::Terminator, "\n", span)),
            ';' | ',' => Ok(Token::new(TokenKind::Terminator, ch.to_string(), span)),

            // Strings
            '"' | '\'' => self.string_with_delimiter(ch, span),

            // Numbers
            '0'..='9' => self.number(span),

            // Identifiers / keywords
            c if c.is_alphabetic() || c == '_' => Ok(self.identifier(c, span)),

            // One-letter operators
            '.' | '(' | ')' | '[' | ']' | '{' | '}' => {
                Ok(Token::new(TokenKind::Operator, ch.to_string(), span))
            }

            // Two-or-one-letter operators: the trailing `=` is optional
            '=' | '<' | '>' | '+' | '-' | '*' | '/' | '%' | ':' => {
                let mut lex = ch.to_string();
                if self.match_char('=') {
                    lex.push('=');
                }
                Ok(Token::new(TokenKind::Operator, lex, span))
            }

            // `!` is only valid as part of `!=`
            '!' => {
                if self.match_char('=') {
                    Ok(Token::new(TokenKind::Operator, "!=", span))
                } else {
                    Err(FangError::lex_error("standalone '!' is not a valid token", span)
                        .with_help("use 'not' for negation or '!=' for inequality"))
                }
            }

            other => Err(FangError::lex_error(
                format!("unknown character '{}'", other),
                span,
            )),
        }
    }

    /// Skips spaces, tabs, carriage returns, and all three comment forms.
    fn skip_blanks_and_comments(&mut self) -> Result<(), FangError> {
        loop {
            match self.peek() {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }

                '#' => self.line_comment(),

                '/' => match self.peek_next() {
                    '/' => self.line_comment(),
                    '*' => {
                        let span = self.position();
                        self.advance(); // '/'
                        self.advance(); // '*'
                        self.block_comment(span)?;
                    }
                    // A lone '/' is the division operator.
                    _ => return Ok(()),
                },

                _ => return Ok(()),
            }
        }
    }

    /// Consumes a `#` or `//` comment up to (not including) the newline,
    /// so the newline still terminates the statement.
    fn line_comment(&mut self) {
        while self.peek() != '\n' && !self.is_at_end() {
            self.advance();
        }
    }

    /// Skips a block comment delimited by `/* ... */`.
    fn block_comment(&mut self, span: Span) -> Result<(), FangError> {
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(FangError::lex_error("unterminated block comment", span))
    }

    /// Parses a string literal using the provided quote delimiter,
    /// resolving escape sequences into the emitted lexeme.
    fn string_with_delimiter(&mut self, delimiter: char, span: Span) -> Result<Token, FangError> {
        let mut value = String::new();

        loop {
            if self.is_at_end() || self.peek() == '\n' {
                return Err(FangError::lex_error("unterminated string", span));
            }

            let ch = self.advance();

            if ch == delimiter {
                return Ok(Token::new(TokenKind::String, value, span));
            }

            if ch != '\\' {
                value.push(ch);
                continue;
            }

            if self.is_at_end() {
                return Err(FangError::lex_error("unterminated string", span));
            }

            let escape_span = self.position();
            match self.advance() {
                'b' => value.push('\u{0008}'),
                'f' => value.push('\u{000C}'),
                'n' => value.push('\n'),
                'r' => value.push('\r'),
                't' => value.push('\t'),
                '"' => value.push('"'),
                '\'' => value.push('\''),
                '\\' => value.push('\\'),
                '/' => value.push('/'),
                'u' => value.push(self.unicode_escape(escape_span)?),
                other => {
                    return Err(FangError::lex_error(
                        format!("unknown escape sequence '\\{}'", other),
                        escape_span,
                    ));
                }
            }
        }
    }

    /// Parses the 4 hex digits of a `\uXXXX` escape.
    fn unicode_escape(&mut self, span: Span) -> Result<char, FangError> {
        let mut code: u32 = 0;

        for _ in 0..4 {
            let digit = if self.is_at_end() { '\0' } else { self.advance() };
            let value = digit
                .to_digit(16)
                .ok_or_else(|| FangError::lex_error("malformed \\uXXXX escape", span))?;
            code = code * 16 + value;
        }

        char::from_u32(code)
            .ok_or_else(|| FangError::lex_error("malformed \\uXXXX escape", span))
    }

    /// Parses an integer or floating-point numeric literal.
    ///
    /// A `.` directly followed by an identifier-starting character ends
    /// the number instead of starting a fraction, so `foo.10.bar` lexes as
    /// a three-segment member access.
    fn number(&mut self, span: Span) -> Result<Token, FangError> {
        let start = self.current - 1;

        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' {
            let after_dot = self.peek_next();
            if after_dot.is_ascii_digit() {
                self.advance(); // consume '.'
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            } else if !(after_dot.is_alphabetic() || after_dot == '_') {
                let dot_span = self.position();
                return Err(FangError::lex_error(
                    "a digit must follow the decimal point",
                    dot_span,
                ));
            }
            // Otherwise the dot is a member-access operator; leave it.
        }

        // Optional exponent. A bare `e` with no digits after it is not an
        // exponent; the number ends before it.
        if self.peek() == 'e' || self.peek() == 'E' {
            let mut lookahead = self.current + 1;
            if matches!(self.chars.get(lookahead), Some('+') | Some('-')) {
                lookahead += 1;
            }
            if matches!(self.chars.get(lookahead), Some(c) if c.is_ascii_digit()) {
                self.advance(); // e / E
                if self.peek() == '+' || self.peek() == '-' {
                    self.advance();
                }
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
        }

        let text: String = self.chars[start..self.current].iter().collect();
        Ok(Token::new(TokenKind::Number, text, span))
    }

    /// Parses an identifier or keyword token.
    fn identifier(&mut self, first: char, span: Span) -> Token {
        let mut text = String::new();
        text.push(first);

        while self.peek().is_alphanumeric() || self.peek() == '_' {
            text.push(self.advance());
        }

        let kind = if is_keyword(&text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        Token::new(kind, text, span)
    }

    fn position(&self) -> Span {
        Span::new(self.line, self.column)
    }

    /// Advances the cursor by one character, maintaining line/column.
    fn advance(&mut self) -> char {
        let ch = self.chars[self.current];
        self.current += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    /// Conditionally consumes the next character.
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            return false;
        }
        self.advance();
        true
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.chars.len() {
            '\0'
        } else {
            self.chars[self.current + 1]
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token().expect("lex failure");
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn lexemes(source: &str) -> Vec<String> {
        lex_all(source)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.lexeme)
            .collect()
    }

    fn lex_error(source: &str) -> FangError {
        let mut lexer = Lexer::new(source);
        loop {
            match lexer.next_token() {
                Ok(t) if t.kind == TokenKind::Eof => panic!("expected a lex error"),
                Ok(_) => continue,
                Err(e) => return e,
            }
        }
    }

    #[test]
    fn numbers_int_and_float() {
        assert_eq!(lexemes("42 3.14 0.5 2e10 6.02E+23 1e-3"), vec![
            "42", "3.14", "0.5", "2e10", "6.02E+23", "1e-3"
        ]);
    }

    #[test]
    fn dot_before_identifier_ends_number() {
        let tokens = lex_all("foo.10.bar");
        let texts: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(texts, vec!["foo", ".", "10", ".", "bar", ""]);
        assert_eq!(tokens[2].kind, TokenKind::Number);
    }

    #[test]
    fn dangling_decimal_point_is_an_error() {
        let err = lex_error("x = 10.");
        assert!(err.message.contains("decimal point"), "{}", err.message);
    }

    #[test]
    fn bare_exponent_letter_is_not_consumed() {
        let texts = lexemes("10eggs");
        assert_eq!(texts, vec!["10", "eggs"]);
    }

    #[test]
    fn string_escapes() {
        let tokens = lex_all(r#""a\tb\n\"c\"" 'dA'"#);
        assert_eq!(tokens[0].lexeme, "a\tb\n\"c\"");
        assert_eq!(tokens[1].lexeme, "dA");
    }

    #[test]
    fn unterminated_string() {
        let err = lex_error("\"oops");
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn newline_inside_string_is_unterminated() {
        let err = lex_error("\"line one\nline two\"");
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn malformed_unicode_escape() {
        let err = lex_error(r#""\uZZ11""#);
        assert!(err.message.contains("\\uXXXX"));
    }

    #[test]
    fn operators_single_and_double() {
        assert_eq!(
            lexemes("a == b != c <= d >= e += f := g"),
            vec!["a", "==", "b", "!=", "c", "<=", "d", ">=", "e", "+=", "f", ":=", "g"]
        );
    }

    #[test]
    fn standalone_bang_is_an_error() {
        let err = lex_error("a ! b");
        assert!(err.message.contains("'!'"));
    }

    #[test]
    fn comments_are_skipped_but_newline_survives() {
        let tokens = lex_all("a # note\nb // other\nc /* block\nstill */ d");
        let texts: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(texts, vec!["a", "\n", "b", "\n", "c", "d", ""]);
    }

    #[test]
    fn unterminated_block_comment() {
        let err = lex_error("a /* never closed");
        assert!(err.message.contains("block comment"));
    }

    #[test]
    fn terminators_and_spans() {
        let tokens = lex_all("a;b\nc");
        assert_eq!(tokens[1].kind, TokenKind::Terminator);
        assert_eq!(tokens[3].kind, TokenKind::Terminator);
        assert_eq!(tokens[4].span, Span::new(2, 1));
    }

    #[test]
    fn keywords_are_classified() {
        let tokens = lex_all("not done and true");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].kind, TokenKind::Keyword);
        assert_eq!(tokens[3].kind, TokenKind::Keyword);
    }
}
