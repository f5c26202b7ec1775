// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Binary and unary operators on values.

use ember_ast::expr::{BinOp, UnaryOp};

use crate::value::Value;

use super::RuntimeError;

pub(super) fn eval_binop(op: BinOp, l: &Value, r: &Value) -> Result<Value, RuntimeError> {
    match (op, l, r) {
        (BinOp::Add, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (BinOp::Add, Value::Text(a), Value::Text(b)) => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Ok(Value::Text(s))
        }
        (BinOp::Sub, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (BinOp::Mul, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (BinOp::Div, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),

        (BinOp::Eq, _, _) => Ok(Value::Bool(l == r)),
        (BinOp::Ne, _, _) => Ok(Value::Bool(l != r)),

        (BinOp::Lt, Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a < b)),
        (BinOp::Le, Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a <= b)),
        (BinOp::Gt, Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a > b)),
        (BinOp::Ge, Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a >= b)),

        (BinOp::Add, _, _) => Err(RuntimeError::TypeMismatch(format!(
            "`+` needs two numbers or two strings, got {} and {}",
            l.type_name(),
            r.type_name()
        ))),
        _ => Err(RuntimeError::TypeMismatch(format!(
            "`{}` needs two numbers, got {} and {}",
            op.symbol(),
            l.type_name(),
            r.type_name()
        ))),
    }
}

pub(super) fn eval_unop(op: UnaryOp, v: &Value) -> Result<Value, RuntimeError> {
    match (op, v) {
        (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOp::Neg, _) => Err(RuntimeError::TypeMismatch(format!(
            "`-` needs a number, got {}",
            v.type_name()
        ))),
        (UnaryOp::Not, _) => Ok(Value::Bool(!v.is_truthy())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval_binop(BinOp::Add, &num(2.0), &num(3.0)).unwrap(), num(5.0));
        assert_eq!(eval_binop(BinOp::Sub, &num(2.0), &num(3.0)).unwrap(), num(-1.0));
        assert_eq!(eval_binop(BinOp::Mul, &num(2.5), &num(4.0)).unwrap(), num(10.0));
        assert_eq!(eval_binop(BinOp::Div, &num(1.0), &num(4.0)).unwrap(), num(0.25));
    }

    #[test]
    fn division_by_zero_is_infinite() {
        assert_eq!(eval_binop(BinOp::Div, &num(1.0), &num(0.0)).unwrap(), num(f64::INFINITY));
    }

    #[test]
    fn plus_concatenates_strings() {
        assert_eq!(eval_binop(BinOp::Add, &text("foo"), &text("bar")).unwrap(), text("foobar"));
    }

    #[test]
    fn plus_rejects_mixed_operands() {
        let err = eval_binop(BinOp::Add, &num(1.0), &text("a")).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch(_)));
        assert_eq!(err.to_string(), "`+` needs two numbers or two strings, got number and string");
    }

    #[test]
    fn arithmetic_rejects_non_numbers() {
        for op in [BinOp::Sub, BinOp::Mul, BinOp::Div, BinOp::Lt, BinOp::Ge] {
            let err = eval_binop(op, &text("a"), &num(1.0)).unwrap_err();
            assert!(matches!(err, RuntimeError::TypeMismatch(_)), "{:?}", op);
        }
    }

    #[test]
    fn equality_across_types() {
        assert_eq!(eval_binop(BinOp::Eq, &num(1.0), &num(1.0)).unwrap(), Value::Bool(true));
        assert_eq!(eval_binop(BinOp::Eq, &num(1.0), &text("1")).unwrap(), Value::Bool(false));
        assert_eq!(eval_binop(BinOp::Eq, &Value::Nil, &Value::Nil).unwrap(), Value::Bool(true));
        assert_eq!(eval_binop(BinOp::Ne, &text("a"), &text("b")).unwrap(), Value::Bool(true));
    }

    #[test]
    fn comparisons() {
        assert_eq!(eval_binop(BinOp::Lt, &num(1.0), &num(2.0)).unwrap(), Value::Bool(true));
        assert_eq!(eval_binop(BinOp::Le, &num(2.0), &num(2.0)).unwrap(), Value::Bool(true));
        assert_eq!(eval_binop(BinOp::Gt, &num(1.0), &num(2.0)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn unary() {
        assert_eq!(eval_unop(UnaryOp::Neg, &num(3.0)).unwrap(), num(-3.0));
        assert!(eval_unop(UnaryOp::Neg, &text("x")).is_err());
        assert_eq!(eval_unop(UnaryOp::Not, &Value::Nil).unwrap(), Value::Bool(true));
        assert_eq!(eval_unop(UnaryOp::Not, &num(0.0)).unwrap(), Value::Bool(false));
    }
}
