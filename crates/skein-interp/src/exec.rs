// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The program-counter-driven execution loop.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

use skein_lexer::{logical_lines, tokenize, Line};

use crate::context::Context;
use crate::dispatch::Action;
use crate::errors::{Fault, RuntimeError};
use crate::flow;
use crate::services::{
    DiskStore, FileStore, InputSource, OutputSink, RandomSource, StdinInput, StdoutSink,
    ThreadRandom,
};
use crate::value::Value;

/// How a script is being run.
#[derive(Debug, Clone)]
pub enum RunMode {
    /// A top-level script; completion carries no value.
    Standalone,
    /// A function body invoked via `@RUN:`; completion yields the
    /// function's result.
    Function,
    /// An imported module; completion yields the variables declared
    /// public by the importer.
    Module { public: Vec<String> },
}

/// What a completed run produced.
#[derive(Debug)]
pub enum RunOutcome {
    Completed,
    /// The function's result. Always `Nil` today: the grammar has no
    /// return statement yet, and the result is threaded so adding one
    /// does not reshape the loop.
    Returned(Value),
    /// Public variables in definition order.
    Exports(IndexMap<String, Value>),
}

/// The interpreter: one execution context plus the host services a run
/// is allowed to touch.
pub struct Interpreter {
    pub(crate) ctx: Context,
    pub(crate) input: Box<dyn InputSource>,
    pub(crate) output: Box<dyn OutputSink>,
    pub(crate) files: Box<dyn FileStore>,
    pub(crate) random: Box<dyn RandomSource>,
    /// Identifier reported by `@FILE`.
    pub(crate) source_name: String,
}

impl Interpreter {
    /// An interpreter wired to stdin, stdout, the real file system, and
    /// a thread-local random generator.
    pub fn new() -> Self {
        Self::with_services(
            Box::new(StdinInput),
            Box::new(StdoutSink),
            Box::new(DiskStore),
            Box::new(ThreadRandom),
        )
    }

    pub fn with_services(
        input: Box<dyn InputSource>,
        output: Box<dyn OutputSink>,
        files: Box<dyn FileStore>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            ctx: Context::new(),
            input,
            output,
            files,
            random,
            source_name: "<script>".to_string(),
        }
    }

    /// Returns an interpreter whose output channel is captured into a
    /// shared buffer instead of stdout.
    pub fn with_captured_output() -> (Self, Arc<Mutex<Vec<String>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let interp = Self::with_services(
            Box::new(StdinInput),
            Box::new(Arc::clone(&buffer)),
            Box::new(DiskStore),
            Box::new(ThreadRandom),
        );
        (interp, buffer)
    }

    /// Set the identifier `@FILE` reports, typically the script path.
    pub fn set_source_name(&mut self, name: impl Into<String>) {
        self.source_name = name.into();
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// Run a script to completion or to its first fault.
    pub fn run(&mut self, source: &str, mode: RunMode) -> Result<RunOutcome, Fault> {
        let lines = logical_lines(source);
        self.run_lines(&lines, mode)
    }

    /// Drive the program counter across an already-split block of lines.
    /// Also the entry point for `@RUN:` function bodies.
    pub(crate) fn run_lines(
        &mut self,
        lines: &[Line],
        mode: RunMode,
    ) -> Result<RunOutcome, Fault> {
        let tables = flow::resolve(lines)?;

        let mut pc = 0usize;
        // Suppression state for already-taken branches. Depth counters
        // rather than booleans: a taken branch nested inside another
        // taken branch must not consume the outer block's suppression.
        let mut ignore_endif_depth = 0usize;
        let mut jump_from_else_depth = 0usize;

        while pc < lines.len() {
            let line = &lines[pc];
            if line.is_blank() {
                pc += 1;
                continue;
            }

            match line.text.as_str() {
                "endif" => {
                    // Inert when reached by a jump; consumes one level of
                    // suppression when the taken if-body falls onto it.
                    ignore_endif_depth = ignore_endif_depth.saturating_sub(1);
                    pc += 1;
                    continue;
                }
                "else do" => {
                    // Only reachable by falling out of a taken if-body;
                    // false conditions jump straight into the else body.
                    if jump_from_else_depth > 0 {
                        jump_from_else_depth -= 1;
                        let endif = tables.endif_of_else(pc).ok_or_else(|| {
                            self.fault(RuntimeError::IfStatement(line.number), line)
                        })?;
                        pc = endif + 1;
                    } else {
                        pc += 1;
                    }
                    continue;
                }
                "endwhile" => {
                    // Always loop back to re-evaluate the condition.
                    pc = tables.while_of(pc).ok_or_else(|| {
                        self.fault(RuntimeError::WhileLoop(line.number), line)
                    })?;
                    continue;
                }
                _ => {}
            }

            let tokens = tokenize(&line.text);
            let action = self
                .dispatch(&tokens)
                .map_err(|error| self.fault(error, line))?;

            match action {
                Action::Advance => pc += 1,
                Action::PushScope(name) => {
                    self.ctx
                        .push_program(&name)
                        .map_err(|error| self.fault(error, line))?;
                    pc += 1;
                }
                Action::PopScope(name) => {
                    self.ctx
                        .pop_program(&name)
                        .map_err(|error| self.fault(error, line))?;
                    pc += 1;
                }
                Action::EnterIfTrue => {
                    if tables.else_of(pc).is_some() {
                        jump_from_else_depth += 1;
                    } else {
                        ignore_endif_depth += 1;
                    }
                    pc += 1;
                }
                Action::JumpFromIf => {
                    // False condition: enter the else body directly, or
                    // land on the inert endif. Jumping past the `else do`
                    // line matters: that line's arm consumes suppression
                    // state owned by an enclosing taken branch.
                    pc = match tables.else_of(pc) {
                        Some(else_line) => else_line + 1,
                        None => tables.endif_of(pc).ok_or_else(|| {
                            self.fault(RuntimeError::IfStatement(line.number), line)
                        })?,
                    };
                }
                Action::ExitWhile => {
                    let endwhile = tables.endwhile_of(pc).ok_or_else(|| {
                        self.fault(RuntimeError::WhileLoop(line.number), line)
                    })?;
                    pc = endwhile + 1;
                }
            }
        }

        Ok(match mode {
            RunMode::Standalone => RunOutcome::Completed,
            RunMode::Function => RunOutcome::Returned(Value::Nil),
            RunMode::Module { public } => RunOutcome::Exports(self.ctx.exports(&public)),
        })
    }

    fn fault(&self, error: RuntimeError, line: &Line) -> Fault {
        Fault::new(
            error,
            Some(self.ctx.current_program().to_string()),
            Some(line.number),
        )
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
