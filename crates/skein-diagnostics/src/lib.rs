// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Skein diagnostics.
//!
//! Provides a unified diagnostic type that the CLI and embedders consume.
//! Interpreter faults are converted to [`Diagnostic`] values, which can be
//! rendered for a terminal or serialized as JSON for machine consumption.

pub mod formatter;
pub mod json;

use serde::Serialize;

use skein_interp::Fault;

/// A diagnostic ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Taxonomy name, e.g. `UnknownValueError`.
    pub kind: String,
    pub message: String,
    /// Program scope the failure surfaced in (`<main>` at the root).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// 1-based source line, when the failure maps to a line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Diagnostic {
    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind: kind.into(),
            message: message.into(),
            program: None,
            line: None,
            notes: Vec::new(),
        }
    }

    pub fn warning(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind: kind.into(),
            message: message.into(),
            program: None,
            line: None,
            notes: Vec::new(),
        }
    }

    pub fn in_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn on_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl From<&Fault> for Diagnostic {
    fn from(fault: &Fault) -> Self {
        Self {
            severity: Severity::Error,
            kind: fault.kind().to_string(),
            message: fault.error.to_string(),
            program: fault.program.clone(),
            line: fault.line,
            notes: Vec::new(),
        }
    }
}
