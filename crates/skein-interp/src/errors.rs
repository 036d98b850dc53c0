// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The runtime error taxonomy.
//!
//! Every failure is terminal for the run: the execution loop wraps the
//! error into a [`Fault`] carrying the program scope and line it surfaced
//! on, and unwinds immediately. State after a fault is not guaranteed
//! consistent and must be discarded.

use std::path::PathBuf;

/// A runtime error.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("{0} identifier can't be empty")]
    InvalidIdentifier(&'static str),

    #[error("variable '{0}' has already been defined")]
    AlreadyDefinedVariable(String),

    #[error("variable '{0}' has not been defined")]
    UndefinedVariable(String),

    #[error("program name can't be '{0}'")]
    InvalidProgramName(String),

    #[error("program '{0}' has already been created")]
    ProgramAlreadyCreated(String),

    #[error("program '{0}' is not the current program")]
    InvalidProgram(String),

    #[error("unknown value '{0}'")]
    UnknownValue(String),

    #[error("function '{0}' has not been defined")]
    UnknownFunction(String),

    #[error("invalid control tag '{0}'")]
    InvalidControlTag(String),

    #[error("{0}")]
    InvalidValue(String),

    #[error("file at path '{0}' does not exist")]
    FileNotFound(PathBuf),

    #[error("{0}")]
    Expression(String),

    #[error("unknown pattern [{0}]")]
    UnknownPattern(String),

    #[error("'if' on line {0} has no jump target")]
    IfStatement(usize),

    #[error("'while' on line {0} has no jump target")]
    WhileLoop(usize),

    #[error("{0}")]
    Interpreter(String),

    /// A failure from a nested function run, location already attached.
    #[error("{0}")]
    Nested(Box<Fault>),
}

impl RuntimeError {
    /// The taxonomy name surfaced to the operator.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::InvalidIdentifier(_) => "InvalidIdentifierError",
            RuntimeError::AlreadyDefinedVariable(_) => "AlreadyDefinedVariableError",
            RuntimeError::UndefinedVariable(_) => "UndefinedVariableError",
            RuntimeError::InvalidProgramName(_) => "InvalidProgramNameError",
            RuntimeError::ProgramAlreadyCreated(_) => "ProgramAlreadyCreatedError",
            RuntimeError::InvalidProgram(_) => "InvalidProgramError",
            RuntimeError::UnknownValue(_) => "UnknownValueError",
            RuntimeError::UnknownFunction(_) => "UnknownFunctionError",
            RuntimeError::InvalidControlTag(_) => "InvalidControlTagError",
            RuntimeError::InvalidValue(_) => "InvalidValueError",
            RuntimeError::FileNotFound(_) => "FileNotFoundError",
            RuntimeError::Expression(_) => "ExpressionError",
            RuntimeError::UnknownPattern(_) => "UnknownPatternError",
            RuntimeError::IfStatement(_) => "IfStatementError",
            RuntimeError::WhileLoop(_) => "WhileLoopError",
            RuntimeError::Interpreter(_) => "InterpreterError",
            RuntimeError::Nested(fault) => fault.error.kind(),
        }
    }
}

/// A runtime error with the location it surfaced at.
#[derive(Debug)]
pub struct Fault {
    pub error: RuntimeError,
    /// Program scope at the point of failure (`<main>` at the root).
    pub program: Option<String>,
    /// 1-based source line, when the failure maps to a line.
    pub line: Option<usize>,
}

impl Fault {
    pub fn new(error: RuntimeError, program: Option<String>, line: Option<usize>) -> Self {
        // Nested faults already carry their own location.
        if let RuntimeError::Nested(inner) = error {
            return *inner;
        }
        Self { error, program, line }
    }

    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.error)?;
        match (&self.program, self.line) {
            (Some(program), Some(line)) => {
                write!(f, "; program '{}', on line {}", program, line)
            }
            (Some(program), None) => write!(f, "; program '{}'", program),
            (None, Some(line)) => write!(f, "; line {}", line),
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for Fault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_formats_kind_detail_program_line() {
        let fault = Fault::new(
            RuntimeError::UndefinedVariable("x".into()),
            Some("<main>".into()),
            Some(3),
        );
        assert_eq!(
            fault.to_string(),
            "UndefinedVariableError: variable 'x' has not been defined; program '<main>', on line 3"
        );
    }

    #[test]
    fn nested_fault_keeps_inner_location() {
        let inner = Fault::new(
            RuntimeError::UnknownValue("boo".into()),
            Some("<main>".into()),
            Some(2),
        );
        let rewrapped = Fault::new(
            RuntimeError::Nested(Box::new(inner)),
            Some("outer".into()),
            Some(9),
        );
        assert_eq!(rewrapped.line, Some(2));
        assert_eq!(rewrapped.kind(), "UnknownValueError");
    }
}
