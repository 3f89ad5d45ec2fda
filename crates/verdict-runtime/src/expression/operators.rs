//! Unary and binary operator semantics for FEEL values
//!
//! Comparisons delegate to `Value::compare` so table cells and condition
//! leaves agree. `Missing` operands propagate through arithmetic and logic.

use crate::error::{Result, RuntimeError};
use verdict_core::ast::{BinaryOperator, Operator, UnaryOperator};
use verdict_core::Value;

fn mismatch(op: &str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch(format!(
        "cannot apply '{}' to {} and {}",
        op,
        left.kind_name(),
        right.kind_name()
    ))
}

/// Apply a unary operator
pub(crate) fn unary(op: UnaryOperator, operand: Value) -> Result<Value> {
    match (op, operand) {
        (_, Value::Missing) => Ok(Value::Missing),
        (UnaryOperator::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOperator::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOperator::Not, other) => Err(RuntimeError::TypeMismatch(format!(
            "cannot apply 'not' to {}",
            other.kind_name()
        ))),
        (UnaryOperator::Negate, other) => Err(RuntimeError::TypeMismatch(format!(
            "cannot negate {}",
            other.kind_name()
        ))),
    }
}

/// Apply an arithmetic, comparison or `in` operator to evaluated operands.
///
/// `and`/`or` short-circuit in the evaluator and are rejected here.
pub(crate) fn binary(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value> {
    match op {
        BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div => {
            arithmetic(op, left, right)
        }
        BinaryOperator::In => membership(left, right),
        comparison => {
            let operator = comparison
                .as_condition_operator()
                .ok_or_else(|| mismatch(op.symbol(), left, right))?;
            Ok(Value::Bool(left.compare(operator, right)?))
        }
    }
}

fn arithmetic(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::Missing, _) | (_, Value::Missing) => Ok(Value::Missing),
        (Value::Number(l), Value::Number(r)) => match op {
            BinaryOperator::Add => Ok(Value::Number(l + r)),
            BinaryOperator::Sub => Ok(Value::Number(l - r)),
            BinaryOperator::Mul => Ok(Value::Number(l * r)),
            _ if *r == 0.0 => Err(RuntimeError::DivisionByZero),
            _ => Ok(Value::Number(l / r)),
        },
        (Value::Text(l), Value::Text(r)) if op == BinaryOperator::Add => {
            Ok(Value::Text(format!("{}{}", l, r)))
        }
        _ => Err(mismatch(op.symbol(), left, right)),
    }
}

/// Boolean operand of `and`/`or`; `Missing` is unknown
pub(crate) fn truth(op: BinaryOperator, value: &Value) -> Result<Option<bool>> {
    match value {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Missing => Ok(None),
        other => Err(RuntimeError::TypeMismatch(format!(
            "'{}' expects booleans, got {}",
            op.symbol(),
            other.kind_name()
        ))),
    }
}

/// Three-valued AND
pub(crate) fn and(left: Option<bool>, right: Option<bool>) -> Value {
    match (left, right) {
        (Some(false), _) | (_, Some(false)) => Value::Bool(false),
        (Some(true), Some(true)) => Value::Bool(true),
        _ => Value::Missing,
    }
}

/// Three-valued OR
pub(crate) fn or(left: Option<bool>, right: Option<bool>) -> Value {
    match (left, right) {
        (Some(true), _) | (_, Some(true)) => Value::Bool(true),
        (Some(false), Some(false)) => Value::Bool(false),
        _ => Value::Missing,
    }
}

/// `in` against an evaluated list or single value
fn membership(value: &Value, target: &Value) -> Result<Value> {
    let operator = match target {
        Value::List(_) => Operator::In,
        _ => Operator::Eq,
    };
    Ok(Value::Bool(value.compare(operator, target)?))
}
