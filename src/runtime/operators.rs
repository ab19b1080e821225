//! Operator semantics
//!
//! Arithmetic keeps integers when both operands are integers and widens to
//! floats otherwise. `dividir` always produces a float. Integer overflow is an
//! execution error rather than a wrap.

use std::cmp::Ordering;

use crate::error::{NahualError, NahualResult};
use crate::parser::ast::{BinaryOp, UnaryOp};
use crate::types::TypeChecker;
use super::value::Value;

pub fn eval_binary(op: BinaryOp, left: Value, right: Value) -> NahualResult<Value> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Subtract => arithmetic(op, left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Multiply => arithmetic(op, left, right, i64::checked_mul, |a, b| a * b),
        BinaryOp::Divide => divide(left, right),
        BinaryOp::Modulo => modulo(left, right),
        BinaryOp::Equal => {
            TypeChecker::check_comparable(op.as_str(), &left, &right)?;
            Ok(Value::Boolean(values_equal(&left, &right)))
        }
        BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
            compare(op, &left, &right)
        }
    }
}

pub fn eval_unary(op: UnaryOp, operand: Value) -> NahualResult<Value> {
    match op {
        UnaryOp::Negate => match operand {
            Value::Integer(n) => n.checked_neg().map(Value::Integer).ok_or_else(overflow),
            Value::Float(f) => Ok(Value::Float(-f)),
            other => Err(NahualError::type_mismatch(
                format!("cannot negate {}", other.type_name()),
                "espiritu/energia",
                other.type_name(),
            )),
        },
        UnaryOp::Not => Ok(Value::Boolean(!TypeChecker::check_boolean("no", &operand)?)),
    }
}

/// Structural equality; integers and floats compare by numeric value.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.elements.len() == b.elements.len()
                && a.elements
                    .iter()
                    .zip(&b.elements)
                    .all(|(x, y)| values_equal(x, y))
        }
        (a, b) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
    }
}

fn overflow() -> NahualError {
    NahualError::execution("integer overflow")
}

fn add(left: Value, right: Value) -> NahualResult<Value> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (left, right) => arithmetic(BinaryOp::Add, left, right, i64::checked_add, |a, b| a + b),
    }
}

fn arithmetic(
    op: BinaryOp,
    left: Value,
    right: Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> NahualResult<Value> {
    TypeChecker::check_numeric(op.as_str(), &left, &right)?;

    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => int_op(*a, *b).map(Value::Integer).ok_or_else(overflow),
        _ => Ok(Value::Float(float_op(widen(&left)?, widen(&right)?))),
    }
}

fn divide(left: Value, right: Value) -> NahualResult<Value> {
    TypeChecker::check_numeric(BinaryOp::Divide.as_str(), &left, &right)?;
    if right.is_zero() {
        return Err(NahualError::execution("division by zero"));
    }
    Ok(Value::Float(widen(&left)? / widen(&right)?))
}

/// Floored remainder: the result takes the sign of the divisor.
fn modulo(left: Value, right: Value) -> NahualResult<Value> {
    TypeChecker::check_numeric(BinaryOp::Modulo.as_str(), &left, &right)?;
    if right.is_zero() {
        return Err(NahualError::execution("division by zero"));
    }

    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => {
            let r = a.checked_rem(*b).ok_or_else(overflow)?;
            if r != 0 && (r < 0) != (*b < 0) {
                Ok(Value::Integer(r + b))
            } else {
                Ok(Value::Integer(r))
            }
        }
        _ => {
            let (a, b) = (widen(&left)?, widen(&right)?);
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) {
                Ok(Value::Float(r + b))
            } else {
                Ok(Value::Float(r))
            }
        }
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> NahualResult<Value> {
    TypeChecker::check_numeric(op.as_str(), left, right)?;

    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        _ => widen(left)?.partial_cmp(&widen(right)?),
    };

    // NaN compares false with everything
    let result = match ordering {
        None => false,
        Some(ordering) => match op {
            BinaryOp::Less => ordering == Ordering::Less,
            BinaryOp::LessEqual => ordering != Ordering::Greater,
            BinaryOp::Greater => ordering == Ordering::Greater,
            BinaryOp::GreaterEqual => ordering != Ordering::Less,
            _ => return Err(NahualError::internal(format!("'{}' is not relational", op.as_str()))),
        },
    };
    Ok(Value::Boolean(result))
}

fn widen(value: &Value) -> NahualResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| NahualError::internal(format!("{} reached numeric evaluation", value.type_name())))
}
