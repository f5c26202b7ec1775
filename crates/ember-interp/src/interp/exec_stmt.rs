// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement execution.

use ember_ast::stmt::{Stmt, StmtKind};
use tracing::trace;

use crate::value::Value;

use super::{Interpreter, RuntimeDiagnostic, RuntimeError};

impl Interpreter {
    pub(super) fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeDiagnostic> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(())
            }

            StmtKind::Print(expr) => {
                let value = self.eval_expr(expr)?;
                self.write_line(&value.to_string());
                Ok(())
            }

            StmtKind::Var { name, init } => {
                let value = match init {
                    Some(init) => self.eval_expr(init)?,
                    None => Value::Nil,
                };
                self.env.define(name.clone(), value);
                Ok(())
            }

            StmtKind::Block(stmts) => {
                self.env.push_scope();
                let result = stmts.iter().try_for_each(|s| self.exec_stmt(s));
                self.env.pop_scope();
                result
            }

            StmtKind::Class(decl) => {
                trace!(class = %decl.name, methods = decl.methods.len(), "register class");
                self.classes.insert(decl.name.clone(), decl.clone());
                Ok(())
            }

            StmtKind::Function(_) => Err(RuntimeDiagnostic::new(
                RuntimeError::Unsupported(stmt.kind.describe()),
                stmt.span,
            )),
        }
    }
}
