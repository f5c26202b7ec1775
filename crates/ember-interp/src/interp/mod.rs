// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The interpreter implementation.
//!
//! This is a tree-walk interpreter that directly evaluates the syntax tree.
//! Class instances are allocated on a [`Heap`] and collected when the live
//! object count passes the configured threshold.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

mod eval_expr;
mod exec_stmt;
mod gc;
mod operators;

use ember_ast::decl::ClassDecl;
use ember_ast::stmt::Stmt;
use ember_ast::Span;

use crate::config::InterpConfig;
use crate::env::Environment;
use crate::heap::{Handle, Heap};
use crate::value::Value;

pub use gc::HeapStats;

/// The tree-walk interpreter.
pub struct Interpreter {
    /// Variable bindings (scoped).
    pub(crate) env: Environment,
    pub(crate) heap: Heap,
    /// Class declarations by name. Re-declaring a class replaces the entry.
    classes: HashMap<String, ClassDecl>,
    /// Values an in-progress expression still needs while a sibling
    /// subexpression runs. Treated as roots by the collector.
    pending: Vec<Value>,
    config: InterpConfig,
    stats: HeapStats,
    /// Optional output buffer for capturing `print` output (used in tests).
    output_buffer: Option<Rc<RefCell<String>>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpConfig::default())
    }

    pub fn with_config(config: InterpConfig) -> Self {
        Self {
            env: Environment::new(),
            heap: Heap::new(),
            classes: HashMap::new(),
            pending: Vec::new(),
            config,
            stats: HeapStats::default(),
            output_buffer: None,
        }
    }

    /// Returns interpreter and output buffer reference.
    pub fn with_captured_output() -> (Self, Rc<RefCell<String>>) {
        Self::with_config_captured(InterpConfig::default())
    }

    pub fn with_config_captured(config: InterpConfig) -> (Self, Rc<RefCell<String>>) {
        let buffer = Rc::new(RefCell::new(String::new()));
        let mut interp = Self::with_config(config);
        interp.output_buffer = Some(Rc::clone(&buffer));
        (interp, buffer)
    }

    pub fn config(&self) -> &InterpConfig {
        &self.config
    }

    /// Run a program, stopping at the first runtime error.
    ///
    /// State persists across calls, so a REPL-style driver can feed one
    /// statement list at a time.
    pub fn interpret(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeDiagnostic> {
        for stmt in stmts {
            self.exec_stmt(stmt)?;
        }
        debug_assert!(self.pending.is_empty());
        Ok(())
    }

    /// Look up a global or local binding by name.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.env.get(name).ok()
    }

    /// Read a field of the instance `value` refers to.
    pub fn field(&self, value: &Value, name: &str) -> Result<Value, RuntimeError> {
        let handle = expect_instance(value, "read a field of")?;
        Ok(self.heap.instance(handle)?.get_field(name))
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    fn write_line(&self, s: &str) {
        if let Some(buf) = &self.output_buffer {
            let mut buf = buf.borrow_mut();
            buf.push_str(s);
            buf.push('\n');
        } else {
            println!("{}", s);
        }
    }
}

/// Extract the handle from an instance value, or fail with a type mismatch
/// naming what the caller tried to do.
fn expect_instance(value: &Value, action: &str) -> Result<Handle, RuntimeError> {
    value.as_handle().ok_or_else(|| {
        RuntimeError::TypeMismatch(format!(
            "only instances have fields; cannot {} a {}",
            action,
            value.type_name()
        ))
    })
}

/// Runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("unknown class `{0}`; declare it with `class {0} {{}}` first")]
    UnknownClass(String),

    #[error("{0}")]
    TypeMismatch(String),

    #[error("dangling reference: object {0} was already freed")]
    DanglingReference(Handle),

    #[error("{0} is not supported by the interpreter yet")]
    Unsupported(&'static str),
}

impl RuntimeError {
    /// Fix-it hint shown under the diagnostic.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RuntimeError::UndefinedVariable(_) => Some("declare it with `var` before using it"),
            RuntimeError::UnknownClass(_) => None,
            RuntimeError::TypeMismatch(_) => None,
            RuntimeError::DanglingReference(_) => {
                Some("a live object was collected; this is an interpreter bug")
            }
            RuntimeError::Unsupported(_) => Some("only classes, fields and variables can run today"),
        }
    }
}

/// Runtime error with source location for diagnostic display.
#[derive(Debug)]
pub struct RuntimeDiagnostic {
    pub error: RuntimeError,
    pub span: Span,
}

impl RuntimeDiagnostic {
    pub fn new(error: RuntimeError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for RuntimeDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for RuntimeDiagnostic {}
