// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression evaluation and control tags.

use skein_ast::{BinOp, Expr, UnaryOp};
use skein_lexer::logical_lines;
use skein_parser::parse_expr;

use crate::errors::RuntimeError;
use crate::exec::{Interpreter, RunMode, RunOutcome};
use crate::value::{self, Value};

impl Interpreter {
    /// Resolve one expression token to a value.
    pub(crate) fn eval_token(&mut self, token: &str) -> Result<Value, RuntimeError> {
        let expr = parse_expr(token);
        self.eval(&expr)
    }

    pub(crate) fn eval(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(x) => Ok(Value::Float(*x)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Nil => Ok(Value::Nil),
            Expr::FilePath(path) => Ok(Value::FilePath(path.into())),
            Expr::ControlTag(tag) => self.eval_control_tag(tag),

            // Variables resolve by value; later assignment never aliases.
            Expr::Ident(name) => match self.ctx.variable(name) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::UnknownValue(name.clone())),
            },

            Expr::Unary {
                op: UnaryOp::Not,
                operand,
            } => {
                let value = self.eval(operand)?;
                Ok(Value::Bool(!value.is_truthy()))
            }

            // `and`/`or` short-circuit on the first operand's truthiness;
            // everything else evaluates both operands in textual order.
            Expr::Binary {
                op: BinOp::And,
                left,
                right,
            } => {
                if !self.eval(left)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval(right)?.is_truthy()))
            }
            Expr::Binary {
                op: BinOp::Or,
                left,
                right,
            } => {
                if self.eval(left)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval(right)?.is_truthy()))
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                value::apply_binary(*op, left, right)
            }
        }
    }

    /// Resolve an `@`-prefixed built-in.
    fn eval_control_tag(&mut self, tag: &str) -> Result<Value, RuntimeError> {
        match tag {
            "@IN" => match self.input.read_line() {
                Some(line) => Ok(Value::Str(line)),
                None => Err(RuntimeError::InvalidValue(
                    "input source is exhausted".into(),
                )),
            },
            // `@OUT` is a send destination, never a readable value.
            "@FILE" => Ok(Value::Str(self.source_name.clone())),
            "@LIST" => Ok(Value::List(Vec::new())),
            _ if tag.starts_with("@RAND:") => self.eval_rand(&tag["@RAND:".len()..]),
            _ if tag.starts_with("@LEN:") => self.eval_len(&tag["@LEN:".len()..]),
            _ if tag.starts_with("@RUN:") => self.eval_run(&tag["@RUN:".len()..]),
            _ => Err(RuntimeError::InvalidControlTag(tag.to_string())),
        }
    }

    /// `@RAND:<min>:<max>` — both bounds are full expressions.
    fn eval_rand(&mut self, operands: &str) -> Result<Value, RuntimeError> {
        let (min_text, max_text) = operands.split_once(':').ok_or_else(|| {
            RuntimeError::InvalidValue(format!(
                "'@RAND:{}' is missing a bound; expected '@RAND:<min>:<max>'",
                operands
            ))
        })?;
        let min = self.eval_token(min_text)?;
        let max = self.eval_token(max_text)?;
        let (Value::Int(min), Value::Int(max)) = (&min, &max) else {
            return Err(RuntimeError::InvalidValue(format!(
                "'@RAND' bounds must be integers, got {} and {}",
                min.type_name(),
                max.type_name()
            )));
        };
        if min > max {
            return Err(RuntimeError::InvalidValue(format!(
                "'@RAND' minimum {} is greater than maximum {}",
                min, max
            )));
        }
        Ok(Value::Int(self.random.uniform(*min, *max)))
    }

    /// `@LEN:<expr>` — character or element count.
    fn eval_len(&mut self, operand: &str) -> Result<Value, RuntimeError> {
        let value = self.eval_token(operand)?;
        match value.length() {
            Some(len) => Ok(Value::Int(len as i64)),
            None => Err(RuntimeError::InvalidValue(format!(
                "value of type {} has no length",
                value.type_name()
            ))),
        }
    }

    /// `@RUN:<name>` — invoke a registered function through the
    /// execution loop and yield its result.
    fn eval_run(&mut self, name: &str) -> Result<Value, RuntimeError> {
        let body = match self.ctx.function(name) {
            Some(function) => function.body.clone(),
            None => return Err(RuntimeError::UnknownFunction(name.to_string())),
        };
        let lines = logical_lines(&body);
        match self.run_lines(&lines, RunMode::Function) {
            Ok(RunOutcome::Returned(value)) => Ok(value),
            Ok(_) => Ok(Value::Nil),
            Err(fault) => Err(RuntimeError::Nested(Box::new(fault))),
        }
    }
}
