// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation: recursive descent for statements, Pratt
//! parsing for expressions.

use ember_ast::decl::{ClassDecl, FnDecl};
use ember_ast::expr::{BinOp, Expr, ExprKind, UnaryOp};
use ember_ast::stmt::{Stmt, StmtKind};
use ember_ast::token::{Token, TokenKind};
use ember_ast::{NodeId, Span};

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// Binding power of prefix `-` and `!`: tighter than any binary operator,
/// looser than `.` and calls.
const PREFIX_BP: u8 = 9;

/// The parser for Ember source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
    next_node_id: u32,
}

impl Parser {
    /// Token streams from the lexer already end in `Eof`; one is appended
    /// to any stream that doesn't.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token { kind: TokenKind::Eof, span: Span::new(end, end) });
        }
        Self { tokens, pos: 0, errors: Vec::new(), next_node_id: 0 }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Record error, return if should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    /// Skip to the next statement boundary after an error.
    ///
    /// Stops after a `;` or a balanced `{ ... }`, before a statement keyword,
    /// or before a `}` that closes the enclosing block.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Semi if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::Class | TokenKind::Fun | TokenKind::Var | TokenKind::Print
                | TokenKind::If | TokenKind::While | TokenKind::Return
                    if depth == 0 =>
                {
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if self.at_end() {
            return self.current();
        }
        self.pos += 1;
        &self.tokens[self.pos - 1]
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self, fallback: usize) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
            .unwrap_or(fallback)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(kind.display_name(), self.current_kind(), self.current().span))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                Ok((name, span))
            }
            _ => Err(ParseError::expected("a name", self.current_kind(), self.current().span)),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn parse(&mut self) -> ParseResult {
        let mut stmts = Vec::new();

        while !self.at_end() {
            let before = self.pos;
            match self.parse_declaration() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize();
                    // A stray `}` at top level stops synchronize without
                    // consuming anything.
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
        }

        ParseResult {
            stmts,
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;
        let kind = match self.current_kind() {
            TokenKind::Class => StmtKind::Class(self.parse_class_decl()?),
            TokenKind::Fun => {
                self.advance();
                StmtKind::Function(self.parse_fn_decl()?)
            }
            TokenKind::Var => self.parse_var_decl()?,
            _ => return self.parse_statement(),
        };
        let end = self.prev_end(start);
        Ok(Stmt { id: self.next_id(), kind, span: Span::new(start, end) })
    }

    fn parse_class_decl(&mut self) -> Result<ClassDecl, ParseError> {
        self.expect(&TokenKind::Class)?;
        let (name, name_span) = self.expect_ident()?;

        if self.check(&TokenKind::Extends) {
            return Err(ParseError::not_implemented(
                "class inheritance",
                "declare the class without `extends`",
                self.current().span,
            ));
        }

        self.expect(&TokenKind::LBrace)?;
        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            methods.push(self.parse_fn_decl()?);
        }
        self.expect(&TokenKind::RBrace)?;

        Ok(ClassDecl { name, name_span, methods })
    }

    /// `name(params) { body }`, shared by `fun` declarations and methods.
    fn parse_fn_decl(&mut self) -> Result<FnDecl, ParseError> {
        let start = self.current().span.start;
        let (name, _) = self.expect_ident()?;
        self.expect(&TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.expect_ident()?.0);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;

        let body = self.parse_block_body()?;
        let end = self.prev_end(start);
        Ok(FnDecl { name, params, body, span: Span::new(start, end) })
    }

    fn parse_var_decl(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(&TokenKind::Var)?;
        let (name, _) = self.expect_ident()?;
        let init = if self.match_token(&TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semi)?;
        Ok(StmtKind::Var { name, init })
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind() {
            TokenKind::Print => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect(&TokenKind::Semi)?;
                StmtKind::Print(value)
            }
            TokenKind::LBrace => StmtKind::Block(self.parse_block_body()?),
            TokenKind::If | TokenKind::While => {
                return Err(ParseError::not_implemented(
                    "control-flow statements",
                    "only declarations, print, blocks and expressions are supported",
                    self.current().span,
                ));
            }
            TokenKind::Return => {
                return Err(ParseError::not_implemented(
                    "return statements",
                    "functions cannot be called yet",
                    self.current().span,
                ));
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::Semi)?;
                StmtKind::Expr(expr)
            }
        };

        let end = self.prev_end(start);
        Ok(Stmt { id: self.next_id(), kind, span: Span::new(start, end) })
    }

    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let before = self.pos;
            match self.parse_declaration() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize();
                    if self.pos == before && !self.check(&TokenKind::RBrace) {
                        self.advance();
                    }
                }
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(stmts)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Assignment is right-associative and only accepts a variable or a
    /// field access on its left.
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_expr_bp(0)?;
        if !self.check(&TokenKind::Eq) {
            return Ok(target);
        }

        let eq_span = self.advance().span;
        let value = Box::new(self.parse_assignment()?);
        let span = target.span.to(value.span);
        let kind = match target.kind {
            ExprKind::Variable(name) => ExprKind::Assign { name, value },
            ExprKind::Get { object, name } => ExprKind::Set { object, name, value },
            _ => return Err(ParseError::invalid_assignment_target(eq_span)),
        };
        Ok(Expr { id: self.next_id(), kind, span })
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            if let Some(bp) = self.postfix_bp() {
                if bp < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs)?;
                continue;
            }

            if let Some((l_bp, r_bp)) = self.infix_bp() {
                if l_bp < min_bp {
                    break;
                }
                let op = self.parse_binop()?;
                let rhs = self.parse_expr_bp(r_bp)?;
                let span = lhs.span.to(rhs.span);
                lhs = Expr {
                    id: self.next_id(),
                    kind: ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) },
                    span,
                };
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                ExprKind::Number(n)
            }
            TokenKind::String(s) => {
                self.advance();
                ExprKind::String(s)
            }
            TokenKind::Bool(b) => {
                self.advance();
                ExprKind::Bool(b)
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::Nil
            }
            TokenKind::Ident(name) => {
                self.advance();
                ExprKind::Variable(name)
            }
            TokenKind::New => {
                self.advance();
                let (class, _) = self.expect_ident()?;
                self.expect(&TokenKind::LParen)?;
                self.expect(&TokenKind::RParen)
                    .map_err(|e| e.with_hint("constructors take no arguments"))?;
                ExprKind::New { class }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::Minus | TokenKind::Bang => {
                let op = if self.check(&TokenKind::Minus) { UnaryOp::Neg } else { UnaryOp::Not };
                self.advance();
                let operand = self.parse_expr_bp(PREFIX_BP)?;
                ExprKind::Unary { op, operand: Box::new(operand) }
            }
            TokenKind::This | TokenKind::Super => {
                return Err(ParseError::not_implemented(
                    "`this` and `super`",
                    "methods cannot be called yet",
                    self.current().span,
                ));
            }
            _ => {
                return Err(ParseError::expected("expression", self.current_kind(), self.current().span));
            }
        };

        let end = self.prev_end(start);
        Ok(Expr { id: self.next_id(), kind, span: Span::new(start, end) })
    }

    fn parse_postfix(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        let start = lhs.span.start;

        let kind = match self.current_kind() {
            TokenKind::Dot => {
                self.advance();
                let (name, _) = self.expect_ident()?;
                ExprKind::Get { object: Box::new(lhs), name }
            }
            TokenKind::LParen => {
                self.advance();
                let mut args = Vec::new();
                if !self.check(&TokenKind::RParen) {
                    loop {
                        args.push(self.parse_expr()?);
                        if !self.match_token(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RParen)?;
                ExprKind::Call { callee: Box::new(lhs), args }
            }
            _ => return Ok(lhs),
        };

        let end = self.prev_end(start);
        Ok(Expr { id: self.next_id(), kind, span: Span::new(start, end) })
    }

    fn postfix_bp(&self) -> Option<u8> {
        match self.current_kind() {
            TokenKind::Dot | TokenKind::LParen => Some(11),
            _ => None,
        }
    }

    fn infix_bp(&self) -> Option<(u8, u8)> {
        match self.current_kind() {
            TokenKind::EqEq | TokenKind::BangEq => Some((1, 2)),
            TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => Some((3, 4)),
            TokenKind::Plus | TokenKind::Minus => Some((5, 6)),
            TokenKind::Star | TokenKind::Slash => Some((7, 8)),
            _ => None,
        }
    }

    fn parse_binop(&mut self) -> Result<BinOp, ParseError> {
        let op = match self.current_kind() {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::BangEq => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::LtEq => BinOp::Le,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::GtEq => BinOp::Ge,
            _ => {
                return Err(ParseError::expected(
                    "operator like '+' or '=='",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        self.advance();
        Ok(op)
    }
}

/// Statements plus any errors found while parsing.
#[derive(Debug)]
pub struct ParseResult {
    pub stmts: Vec<Stmt>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parse error with location and an optional fix-it hint.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { span, message, hint }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn not_implemented(feature: &str, hint: &str, span: Span) -> Self {
        Self {
            span,
            message: format!("not yet implemented: {}", feature),
            hint: Some(hint.to_string()),
        }
    }

    fn invalid_assignment_target(span: Span) -> Self {
        Self {
            span,
            message: "Invalid assignment target".to_string(),
            hint: Some("only variables and fields can be assigned".to_string()),
        }
    }
}

fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "';'" => format!("Expected ';' after statement, found {}", found.display_name()),
        "'{'" => format!("Expected '{{' to start block, found {}", found.display_name()),
        "'}'" => format!("Expected '}}' to close block, found {}", found.display_name()),
        "')'" if matches!(found, TokenKind::Eof) => "Unclosed '(' - missing ')'".to_string(),
        "a name" => format!("Expected name, found {}", found.display_name()),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
