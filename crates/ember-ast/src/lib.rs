// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax tree types for the Ember language.
//!
//! The lexer produces [`token::Token`]s, the parser turns them into
//! [`stmt::Stmt`] sequences, and the interpreter walks those trees without
//! revalidating their shape.

pub mod span;
pub mod token;
pub mod expr;
pub mod stmt;
pub mod decl;

pub use span::{LineMap, Span};

/// Unique identifier for syntax nodes, assigned by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(pub u32);
