// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walk interpreter for the Ember language.
//!
//! Executes statements directly against a scoped environment and a
//! mark-and-sweep heap of class instances.

mod config;
mod env;
mod heap;
mod interp;
mod value;

pub use config::{InterpConfig, DEFAULT_GC_THRESHOLD, GC_THRESHOLD_ENV};
pub use env::Environment;
pub use heap::{Handle, Heap, HeapObject, Instance};
pub use interp::{HeapStats, Interpreter, RuntimeDiagnostic, RuntimeError};
pub use value::Value;
