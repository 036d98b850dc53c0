// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for the Skein language.
//!
//! Splits a script into logical lines and each line into
//! whitespace-delimited tokens with quote-aware handling. Tokenization
//! never fails: malformed input surfaces later, when the interpreter
//! cannot resolve a token to a value or a line to a statement.

mod lines;
mod tokenize;

pub use lines::{logical_lines, Line};
pub use tokenize::tokenize;
