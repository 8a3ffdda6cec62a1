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

pub mod expressions;
pub mod helpers;
pub mod parser;
pub mod statements;

pub use parser::Parser;
