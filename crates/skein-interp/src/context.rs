// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The execution context: variable table, function table, program scopes.
//!
//! The context is passed explicitly through the run rather than living in
//! module state, so independent interpreters never interfere. `#program`
//! scopes are structural only: they validate nesting and naming but share
//! the single flat variable namespace.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::errors::RuntimeError;
use crate::value::Value;

/// Name of the implicit root scope. Not user-assignable.
pub const ROOT_PROGRAM: &str = "<main>";

/// A named function: an owned, immutable block of script lines.
///
/// The grammar has no statement form that defines one; bodies are
/// registered through [`Context::register_function`] by whatever loads
/// the program, and invoked with the `@RUN:` control tag.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub body: String,
}

/// Mutable interpreter state for one run.
#[derive(Debug)]
pub struct Context {
    variables: IndexMap<String, Value>,
    functions: IndexMap<String, Function>,
    /// Scope stack; the bottom element is always the root sentinel.
    scopes: Vec<String>,
    /// Every program name ever created in this run, root included.
    created: HashSet<String>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            variables: IndexMap::new(),
            functions: IndexMap::new(),
            scopes: vec![ROOT_PROGRAM.to_string()],
            created: HashSet::from([ROOT_PROGRAM.to_string()]),
        }
    }

    // --- variables ---

    /// Create a variable. Defining an existing name is an error.
    pub fn define_variable(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        if name.is_empty() {
            return Err(RuntimeError::InvalidIdentifier("variable"));
        }
        if self.variables.contains_key(name) {
            return Err(RuntimeError::AlreadyDefinedVariable(name.to_string()));
        }
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    /// Reassign an existing variable.
    pub fn assign_variable(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        match self.variables.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::UndefinedVariable(name.to_string())),
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Remove a variable, or a function when no variable has the name.
    pub fn delete(&mut self, name: &str) -> Result<(), RuntimeError> {
        if self.variables.shift_remove(name).is_some() {
            return Ok(());
        }
        if self.functions.shift_remove(name).is_some() {
            return Ok(());
        }
        Err(RuntimeError::UndefinedVariable(name.to_string()))
    }

    /// Project the variables named in `public`, in definition order.
    /// Identifiers that were never defined are simply absent.
    pub fn exports(&self, public: &[String]) -> IndexMap<String, Value> {
        self.variables
            .iter()
            .filter(|(name, _)| public.iter().any(|p| p == *name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    // --- functions ---

    /// Register a function body. Part of the program-load surface, not
    /// the statement grammar.
    pub fn register_function(&mut self, name: &str, body: &str) -> Result<(), RuntimeError> {
        if name.is_empty() {
            return Err(RuntimeError::InvalidIdentifier("function"));
        }
        self.functions.insert(
            name.to_string(),
            Function {
                name: name.to_string(),
                body: body.to_string(),
            },
        );
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    // --- program scopes ---

    pub fn current_program(&self) -> &str {
        self.scopes.last().map(String::as_str).unwrap_or(ROOT_PROGRAM)
    }

    /// Enter a `#program` scope. Names must be non-empty, not the root
    /// sentinel, and never used before in this run.
    pub fn push_program(&mut self, name: &str) -> Result<(), RuntimeError> {
        if name.is_empty() {
            return Err(RuntimeError::InvalidIdentifier("program"));
        }
        if name == ROOT_PROGRAM {
            return Err(RuntimeError::InvalidProgramName(name.to_string()));
        }
        if self.created.contains(name) {
            return Err(RuntimeError::ProgramAlreadyCreated(name.to_string()));
        }
        self.created.insert(name.to_string());
        self.scopes.push(name.to_string());
        Ok(())
    }

    /// Leave a `#program` scope; the name must match the current top.
    pub fn pop_program(&mut self, name: &str) -> Result<(), RuntimeError> {
        if name.is_empty() {
            return Err(RuntimeError::InvalidIdentifier("program"));
        }
        if name == ROOT_PROGRAM {
            return Err(RuntimeError::InvalidProgramName(name.to_string()));
        }
        if name != self.current_program() {
            return Err(RuntimeError::InvalidProgram(name.to_string()));
        }
        self.scopes.pop();
        Ok(())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_assign_delete_lifecycle() {
        let mut ctx = Context::new();
        ctx.define_variable("x", Value::Nil).unwrap();
        assert_eq!(ctx.variable("x"), Some(&Value::Nil));
        ctx.assign_variable("x", Value::Int(3)).unwrap();
        assert_eq!(ctx.variable("x"), Some(&Value::Int(3)));
        ctx.delete("x").unwrap();
        assert!(ctx.variable("x").is_none());
    }

    #[test]
    fn double_define_fails() {
        let mut ctx = Context::new();
        ctx.define_variable("x", Value::Nil).unwrap();
        let err = ctx.define_variable("x", Value::Int(1)).unwrap_err();
        assert_eq!(err.kind(), "AlreadyDefinedVariableError");
    }

    #[test]
    fn assign_requires_prior_define() {
        let mut ctx = Context::new();
        let err = ctx.assign_variable("x", Value::Int(1)).unwrap_err();
        assert_eq!(err.kind(), "UndefinedVariableError");
    }

    #[test]
    fn empty_variable_name_is_invalid() {
        let mut ctx = Context::new();
        let err = ctx.define_variable("", Value::Nil).unwrap_err();
        assert_eq!(err.kind(), "InvalidIdentifierError");
    }

    #[test]
    fn delete_falls_back_to_functions_then_fails() {
        let mut ctx = Context::new();
        ctx.register_function("f", "send \"x\" to @OUT").unwrap();
        ctx.delete("f").unwrap();
        assert!(ctx.function("f").is_none());
        let err = ctx.delete("f").unwrap_err();
        assert_eq!(err.kind(), "UndefinedVariableError");
    }

    #[test]
    fn program_scope_discipline() {
        let mut ctx = Context::new();
        assert_eq!(ctx.current_program(), ROOT_PROGRAM);
        ctx.push_program("setup").unwrap();
        assert_eq!(ctx.current_program(), "setup");
        let err = ctx.pop_program("other").unwrap_err();
        assert_eq!(err.kind(), "InvalidProgramError");
        ctx.pop_program("setup").unwrap();
        assert_eq!(ctx.current_program(), ROOT_PROGRAM);
    }

    #[test]
    fn program_names_are_single_use() {
        let mut ctx = Context::new();
        ctx.push_program("p").unwrap();
        ctx.pop_program("p").unwrap();
        let err = ctx.push_program("p").unwrap_err();
        assert_eq!(err.kind(), "ProgramAlreadyCreatedError");
    }

    #[test]
    fn root_sentinel_is_reserved() {
        let mut ctx = Context::new();
        let err = ctx.push_program(ROOT_PROGRAM).unwrap_err();
        assert_eq!(err.kind(), "InvalidProgramNameError");
    }

    #[test]
    fn exports_project_in_definition_order() {
        let mut ctx = Context::new();
        ctx.define_variable("a", Value::Int(1)).unwrap();
        ctx.define_variable("b", Value::Int(2)).unwrap();
        ctx.define_variable("c", Value::Int(3)).unwrap();
        let exports = ctx.exports(&["c".to_string(), "a".to_string()]);
        let names: Vec<_> = exports.keys().cloned().collect();
        assert_eq!(names, ["a", "c"]);
    }
}
