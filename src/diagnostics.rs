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
use crate::span::Span;

/// Responsible for rendering human-friendly, compiler-style diagnostics
/// for FANG errors.
///
/// This printer:
/// - Formats errors with origin/line/column information
/// - Displays the offending source line
/// - Highlights the exact error position using a caret (`^`)
/// - Optionally shows a helpful follow-up hint
///
/// The output is intentionally inspired by `rustc` diagnostics, but
/// simplified for FANG and designed to remain readable without color.
/// It is the sink behind the `stderr_enabled` configuration option; every
/// printed error carries its `#NNNN` correlation tag so a host log line can
/// be matched back to the returned error value.
pub struct DiagnosticPrinter {
    /// Full source code of the script being interpreted.
    source: String,

    /// Origin tag of the script (e.g. `config.fg`, `<inline>`).
    ///
    /// Used only for display purposes in diagnostics.
    origin: String,
}

impl DiagnosticPrinter {
    /// Creates a new diagnostic printer for a given script.
    pub fn new(origin: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            source: source.into(),
        }
    }

    /// Prints a formatted error diagnostic to stderr.
    ///
    /// # Output Example
    /// ```text
    /// error[E_EVAL#17]: cannot divide by zero
    ///   --> config.fg:12:10
    ///    |
    /// 12 | rate = total / parts
    ///    |              ^
    /// help: guard the divisor before dividing.
    /// ```
    pub fn print(&self, error: &FangError) {
        let Some(Span { line, column }) = error.span else {
            // No location: header-only form.
            eprintln!(
                "error[{}#{}]: {}\n  --> {}",
                error.code(),
                error.tag,
                error.message,
                self.origin
            );
            if let Some(help) = &error.help {
                eprintln!("help: {}", help);
            }
            return;
        };

        // Lines are 1-indexed in diagnostics, but vectors are 0-indexed.
        // `saturating_sub` prevents underflow if line == 0.
        let lines: Vec<&str> = self.source.lines().collect();
        let src_line = lines.get(line.saturating_sub(1)).unwrap_or(&"");

        eprintln!(
            "error[{}#{}]: {}\n  --> {}:{}:{}",
            error.code(),
            error.tag,
            error.message,
            self.origin,
            line,
            column
        );

        // Visual separator (matches rustc style)
        eprintln!("   |");
        eprintln!("{:>3} | {}", line, src_line);

        // Caret underline pointing at the column where the error occurred.
        let mut underline = String::new();
        for _ in 0..column.saturating_sub(1) {
            underline.push(' ');
        }
        underline.push('^');
        eprintln!("   | {}", underline);

        if let Some(help) = &error.help {
            eprintln!("\nhelp: {}", help);
        }
    }
}
