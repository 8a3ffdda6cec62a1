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

/// Engine configuration.
///
/// Every limit here is a hard ceiling: reaching it converts the running
/// evaluation into an `E_EVAL` error. There is no other cancellation
/// mechanism in the engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Textual stand-in for ±Infinity. When `None`, any operation that
    /// would produce an infinite float aborts instead.
    pub infinity: Option<String>,

    /// Textual stand-in for NaN. When `None`, any operation that would
    /// produce NaN aborts instead.
    pub nan: Option<String>,

    /// Ceiling on array/block element count.
    pub max_array_size: usize,

    /// Ceiling on evaluator recursion depth.
    pub max_depth: usize,

    /// Ceiling on iterations of a single loop.
    pub max_loop_times: usize,

    /// Restrict the parser to plain JSON documents (plus unquoted keys).
    pub json_only: bool,

    /// Additionally render every error to stderr as a caret diagnostic.
    pub stderr_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            infinity: None,
            nan: None,
            max_array_size: 1000,
            max_depth: 200,
            max_loop_times: 1000,
            json_only: false,
            stderr_enabled: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for deserializing plain JSON documents.
    pub fn json() -> Self {
        Self {
            json_only: true,
            ..Self::default()
        }
    }

    pub fn with_infinity(mut self, text: impl Into<String>) -> Self {
        self.infinity = Some(text.into());
        self
    }

    pub fn with_nan(mut self, text: impl Into<String>) -> Self {
        self.nan = Some(text.into());
        self
    }

    pub fn with_max_array_size(mut self, limit: usize) -> Self {
        self.max_array_size = limit;
        self
    }

    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    pub fn with_max_loop_times(mut self, limit: usize) -> Self {
        self.max_loop_times = limit;
        self
    }

    pub fn with_stderr(mut self, enabled: bool) -> Self {
        self.stderr_enabled = enabled;
        self
    }
}
