// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values.

use std::fmt;

use crate::heap::Handle;

/// A runtime value in the interpreter.
///
/// Instances live on the heap; a value only carries their handle, so cloning
/// an `Instance` value aliases the same object.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Text(String),
    Instance(Handle),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Instance(_) => "instance",
        }
    }

    /// `null` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Value::Instance(handle) => Some(*handle),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Instance(handle) => write!(f, "Instance@{}", handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{Heap, HeapObject, Instance};

    #[test]
    fn numbers_render_without_trailing_zeros() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.125).to_string(), "-0.125");
        assert_eq!(Value::Number(1.0 / 0.0).to_string(), "inf");
    }

    #[test]
    fn scalars_render() {
        assert_eq!(Value::Nil.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Text("hi there".into()).to_string(), "hi there");
    }

    #[test]
    fn instances_render_distinctly() {
        let mut heap = Heap::new();
        let a = heap.allocate(HeapObject::Instance(Instance::new("Point")));
        let b = heap.allocate(HeapObject::Instance(Instance::new("Point")));
        let (a, b) = (Value::Instance(a), Value::Instance(b));
        assert_eq!(a.to_string(), "Instance@0:0");
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::Text(String::new()).is_truthy());
    }

    #[test]
    fn equality_is_structural_and_tag_sensitive() {
        assert_eq!(Value::Number(1.0), Value::Number(1.0));
        assert_eq!(Value::Text("a".into()), Value::Text("a".into()));
        assert_ne!(Value::Number(1.0), Value::Text("1".into()));
        assert_ne!(Value::Nil, Value::Bool(false));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }
}
