// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walk interpreter for the Skein language.
//!
//! Executes scripts line by line: a pre-pass pairs `if`/`else`/`endif`
//! and `while`/`endwhile` blocks, then a program counter walks the lines,
//! re-tokenizing and re-resolving each one on every visit. Host I/O and
//! randomness are injected services, so runs are reproducible under test.

pub mod context;
pub mod errors;
pub mod flow;
pub mod services;
pub mod value;

mod dispatch;
mod eval;
mod exec;

pub use context::{Context, Function, ROOT_PROGRAM};
pub use errors::{Fault, RuntimeError};
pub use exec::{Interpreter, RunMode, RunOutcome};
pub use value::{Array, Value, ValueKind};
