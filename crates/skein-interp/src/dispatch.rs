// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement dispatch.
//!
//! Matches a tokenized line against the grammar's fixed set of forms,
//! mutates the context or drives a side effect, and hands the execution
//! loop an action describing how the program counter should move. A
//! recognized first token with the wrong shape is a failure, never a
//! silent no-op.

use std::path::PathBuf;

use crate::errors::RuntimeError;
use crate::exec::Interpreter;
use crate::value::Value;

/// What the execution loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    /// Fall through to the next line.
    Advance,
    /// `#program <name>`: enter a scope.
    PushScope(String),
    /// `#endprogram <name>`: leave the current scope.
    PopScope(String),
    /// `if` condition was true: execute the body in place.
    EnterIfTrue,
    /// `if` condition was false: jump to the `else`/`endif`.
    JumpFromIf,
    /// `while` condition was false: jump past the `endwhile`.
    ExitWhile,
}

impl Interpreter {
    pub(crate) fn dispatch(&mut self, tokens: &[String]) -> Result<Action, RuntimeError> {
        match tokens {
            [kw, name] if kw == "#program" => Ok(Action::PushScope(name.clone())),
            [kw, name] if kw == "#endprogram" => Ok(Action::PopScope(name.clone())),

            [kw, var] if kw == "define" => {
                self.ctx.define_variable(var, Value::Nil)?;
                Ok(Action::Advance)
            }
            [kw, var, as_kw, rest @ ..] if kw == "define" && as_kw == "as" && !rest.is_empty() => {
                let value = self.eval_token(&rest.join(" "))?;
                self.ctx.define_variable(var, value)?;
                Ok(Action::Advance)
            }
            [kw, var, with_kw, rest @ ..]
                if kw == "assign" && with_kw == "with" && !rest.is_empty() =>
            {
                let value = self.eval_token(&rest.join(" "))?;
                self.ctx.assign_variable(var, value)?;
                Ok(Action::Advance)
            }

            [kw, payload, to_kw, dest] if kw == "send" && to_kw == "to" => {
                let value = self.eval_token(payload)?;
                self.send(value, dest)?;
                Ok(Action::Advance)
            }

            [kw, name] if kw == "delete" => {
                self.ctx.delete(name)?;
                Ok(Action::Advance)
            }

            [kw, condition, then_kw] if kw == "if" && then_kw == "then" => {
                if self.eval_token(condition)?.is_truthy() {
                    Ok(Action::EnterIfTrue)
                } else {
                    Ok(Action::JumpFromIf)
                }
            }
            [kw, condition, do_kw] if kw == "while" && do_kw == "do" => {
                if self.eval_token(condition)?.is_truthy() {
                    Ok(Action::Advance)
                } else {
                    Ok(Action::ExitWhile)
                }
            }

            _ => {
                let listed = tokens
                    .iter()
                    .map(|t| format!("'{}'", t))
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(RuntimeError::UnknownPattern(listed))
            }
        }
    }

    /// `send <value> to <dest>`: `@OUT` writes to the output channel,
    /// anything else must resolve to an existing file to append to.
    fn send(&mut self, value: Value, dest: &str) -> Result<(), RuntimeError> {
        if dest == "@OUT" {
            self.output.write_line(&value.to_string());
            return Ok(());
        }

        let dest_value = self.eval_token(dest)?;
        let path = match dest_value {
            Value::FilePath(path) => path,
            Value::Str(s) => PathBuf::from(s),
            other => {
                return Err(RuntimeError::InvalidValue(format!(
                    "invalid value '{}' for send-to operation",
                    other
                )))
            }
        };
        self.files
            .append(&path, &value.to_string())
            .map_err(|_| RuntimeError::FileNotFound(path))
    }
}
