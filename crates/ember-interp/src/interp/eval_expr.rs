// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression evaluation.

use ember_ast::expr::{Expr, ExprKind};

use crate::heap::{HeapObject, Instance};
use crate::value::Value;

use super::{expect_instance, operators, Interpreter, RuntimeDiagnostic, RuntimeError};

impl Interpreter {
    pub(super) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeDiagnostic> {
        let at = |e: RuntimeError| RuntimeDiagnostic::new(e, expr.span);

        match &expr.kind {
            ExprKind::Nil => Ok(Value::Nil),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::String(s) => Ok(Value::Text(s.clone())),

            ExprKind::Variable(name) => self.env.get(name).cloned().map_err(at),

            ExprKind::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                self.env.assign(name, value.clone()).map_err(at)?;
                Ok(value)
            }

            ExprKind::New { class } => {
                if !self.classes.contains_key(class) {
                    return Err(at(RuntimeError::UnknownClass(class.clone())));
                }
                let handle = self.heap.allocate(HeapObject::Instance(Instance::new(class.as_str())));
                let value = Value::Instance(handle);
                self.with_pinned(value.clone(), |this| this.check_heap_pressure());
                Ok(value)
            }

            ExprKind::Get { object, name } => {
                let target = self.eval_expr(object)?;
                let handle = expect_instance(&target, "read a field of").map_err(at)?;
                let inst = self.heap.instance(handle).map_err(at)?;
                Ok(inst.get_field(name))
            }

            ExprKind::Set { object, name, value } => {
                let target = self.eval_expr(object)?;
                let handle = expect_instance(&target, "set a field on").map_err(at)?;
                let value = self.with_pinned(target, |this| this.eval_expr(value))?;
                self.heap
                    .instance_mut(handle)
                    .map_err(at)?
                    .set_field(name.as_str(), value.clone());
                Ok(value)
            }

            ExprKind::Binary { op, left, right } => {
                let l = self.eval_expr(left)?;
                let r = self.with_pinned(l.clone(), |this| this.eval_expr(right))?;
                operators::eval_binop(*op, &l, &r).map_err(at)
            }

            ExprKind::Unary { op, operand } => {
                let v = self.eval_expr(operand)?;
                operators::eval_unop(*op, &v).map_err(at)
            }

            ExprKind::Call { .. } => Err(at(RuntimeError::Unsupported(expr.kind.describe()))),
        }
    }
}
