// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement nodes.

use crate::decl::{ClassDecl, FnDecl};
use crate::expr::Expr;
use crate::{NodeId, Span};

/// A statement in the syntax tree.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Expression evaluated for effect
    Expr(Expr),
    /// `print expr;`
    Print(Expr),
    /// `var name = init;` (initializer optional)
    Var {
        name: String,
        init: Option<Expr>,
    },
    /// `{ ... }`
    Block(Vec<Stmt>),
    /// `class Name { ... }`
    Class(ClassDecl),
    /// `fun name(params) { ... }`
    Function(FnDecl),
}

impl StmtKind {
    pub fn describe(&self) -> &'static str {
        match self {
            StmtKind::Expr(_) => "expression statement",
            StmtKind::Print(_) => "print statement",
            StmtKind::Var { .. } => "variable declaration",
            StmtKind::Block(_) => "block",
            StmtKind::Class(_) => "class declaration",
            StmtKind::Function(_) => "function declaration",
        }
    }
}
