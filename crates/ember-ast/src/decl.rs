// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Class and function declarations.

use crate::stmt::Stmt;
use crate::Span;

/// A class declaration: a name plus its methods.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub name_span: Span,
    pub methods: Vec<FnDecl>,
}

/// A function or method declaration.
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}
