// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression nodes.

use crate::{NodeId, Span};

/// An expression in the syntax tree.
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// `null`
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    /// Variable reference
    Variable(String),
    /// `name = value`
    Assign {
        name: String,
        value: Box<Expr>,
    },
    /// `new Class()`
    New {
        class: String,
    },
    /// `object.name`
    Get {
        object: Box<Expr>,
        name: String,
    },
    /// `object.name = value`
    Set {
        object: Box<Expr>,
        name: String,
        value: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `callee(args)`. Parsed so that programs using calls get a runtime
    /// diagnostic instead of a parse failure; the interpreter has no call
    /// model yet.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

impl ExprKind {
    /// Short label for diagnostics and tree dumps.
    pub fn describe(&self) -> &'static str {
        match self {
            ExprKind::Nil | ExprKind::Bool(_) | ExprKind::Number(_) | ExprKind::String(_) => "literal",
            ExprKind::Variable(_) => "variable",
            ExprKind::Assign { .. } => "assignment",
            ExprKind::New { .. } => "object construction",
            ExprKind::Get { .. } => "field access",
            ExprKind::Set { .. } => "field assignment",
            ExprKind::Binary { .. } => "binary operation",
            ExprKind::Unary { .. } => "unary operation",
            ExprKind::Call { .. } => "function call",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}
