// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions shared by the lexer and parser.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    String(String),
    Bool(bool),
    Null,

    Ident(String),

    // Keywords
    Class,
    Else,
    Fun,
    If,
    Print,
    Return,
    Super,
    This,
    Var,
    While,
    New,
    Extends,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    BangEq,
    Eq,
    EqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Dot,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semi,

    Eof,
}

impl TokenKind {
    /// Human-readable name used in "expected X, found Y" messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "a number",
            TokenKind::String(_) => "a string",
            TokenKind::Bool(true) => "'true'",
            TokenKind::Bool(false) => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::Ident(_) => "a name",

            TokenKind::Class => "'class'",
            TokenKind::Else => "'else'",
            TokenKind::Fun => "'fun'",
            TokenKind::If => "'if'",
            TokenKind::Print => "'print'",
            TokenKind::Return => "'return'",
            TokenKind::Super => "'super'",
            TokenKind::This => "'this'",
            TokenKind::Var => "'var'",
            TokenKind::While => "'while'",
            TokenKind::New => "'new'",
            TokenKind::Extends => "'extends'",

            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Bang => "'!'",
            TokenKind::BangEq => "'!='",
            TokenKind::Eq => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::Dot => "'.'",

            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semi => "';'",

            TokenKind::Eof => "end of file",
        }
    }
}
