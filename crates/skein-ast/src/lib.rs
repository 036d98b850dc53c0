// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression tree types for the Skein language.
//!
//! This crate defines the nodes shared between the expression parser and
//! the interpreter. Skein statements are dispatched directly from token
//! lists and never build a tree; only the value grammar does.

pub mod expr;

pub use expr::{BinOp, Expr, UnaryOp};
