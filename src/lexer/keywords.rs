/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * File:      keywords.rs
 * Purpose:   Defines all reserved keywords for the FANG scripting language.
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

/// Determines whether a given identifier is a **reserved keyword** in FANG.
///
/// Keyword resolution happens post-scan: the lexer reads a full identifier
/// and then reclassifies it here, so keywords and identifiers share one
/// scanning path.
///
/// FANG keeps the keyword set deliberately tiny; control flow lives in the
/// standard library (`if`, `while`, …) and is dispatched by name at call
/// time, so those names stay ordinary identifiers and can be shadowed.
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "and" |
        "or" |
        "not" |
        "in" |
        "true" |
        "false" |
        "null" |
        "break" |
        "continue" |
        "return" |
        "function" |
        "reference"
    )
}
