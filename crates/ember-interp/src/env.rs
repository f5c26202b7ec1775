// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Environment for variable bindings.

use std::collections::HashMap;

use crate::interp::RuntimeError;
use crate::value::Value;

/// A single lexical scope.
#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, Value>,
}

/// Chain of lexical scopes. The first scope is the global one and is never
/// popped; each later scope's enclosing scope is the one before it.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self { scopes: vec![Scope::default()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the innermost scope. The global scope stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind `name` in the innermost scope, replacing any binding it already
    /// has there and shadowing outer ones.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.into(), value);
        }
    }

    /// Look a name up from the innermost scope outward.
    pub fn get(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))
    }

    /// Overwrite the nearest existing binding of `name`. Never creates one.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let slot = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.bindings.get_mut(name))
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))?;
        *slot = value;
        Ok(())
    }

    /// Every bound value in every live scope.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.scopes.iter().flat_map(|scope| scope.bindings.values())
    }
}
