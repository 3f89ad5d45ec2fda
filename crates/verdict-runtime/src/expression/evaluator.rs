//! Expression evaluator
//!
//! Evaluates FEEL expressions against a context. Decision table cells are
//! evaluated with the column's input value bound to `?`.

use super::{functions, operators};
use crate::context::Context;
use crate::error::{Result, RuntimeError};
use verdict_core::ast::{BinaryOperator, Expression, Operator, Range};
use verdict_core::Value;

/// FEEL expression evaluator
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    /// Evaluate an expression that does not use `?`
    pub fn evaluate(expression: &Expression, context: &Context) -> Result<Value> {
        Self::eval(expression, context, None)
    }

    /// Evaluate an expression with `?` bound to `input`
    pub fn evaluate_with_input(
        expression: &Expression,
        context: &Context,
        input: &Value,
    ) -> Result<Value> {
        Self::eval(expression, context, Some(input))
    }

    /// Evaluate a test; `Missing` counts as false, other non-booleans are errors
    pub fn evaluate_test(
        expression: &Expression,
        context: &Context,
        input: Option<&Value>,
    ) -> Result<bool> {
        match Self::eval(expression, context, input)? {
            Value::Bool(b) => Ok(b),
            Value::Missing => Ok(false),
            other => Err(RuntimeError::TypeMismatch(format!(
                "'{}' evaluated to {} instead of a boolean",
                expression,
                other.kind_name()
            ))),
        }
    }

    fn eval(expression: &Expression, context: &Context, input: Option<&Value>) -> Result<Value> {
        match expression {
            Expression::Literal(value) => Ok(value.clone()),

            Expression::List(items) => items
                .iter()
                .map(|item| Self::eval(item, context, input))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),

            Expression::Range(_) => Err(RuntimeError::TypeMismatch(
                "a range can only be used on the right of 'in'".to_string(),
            )),

            Expression::Path(segments) => {
                let path = segments.join(".");
                context
                    .lookup(&path)
                    .cloned()
                    .ok_or(RuntimeError::UnboundReference(path))
            }

            Expression::Input => input
                .cloned()
                .ok_or_else(|| RuntimeError::UnboundReference("?".to_string())),

            Expression::Unary { op, operand } => {
                operators::unary(*op, Self::eval(operand, context, input)?)
            }

            Expression::Binary { left, op, right } => match op {
                BinaryOperator::And | BinaryOperator::Or => {
                    Self::eval_logic(*op, left, right, context, input)
                }
                BinaryOperator::In => {
                    let value = Self::eval(left, context, input)?;
                    match right.as_ref() {
                        Expression::Range(range) => Self::in_range(&value, range, context, input),
                        target => {
                            let target = Self::eval(target, context, input)?;
                            operators::binary(*op, &value, &target)
                        }
                    }
                }
                _ => {
                    let l = Self::eval(left, context, input)?;
                    let r = Self::eval(right, context, input)?;
                    operators::binary(*op, &l, &r)
                }
            },

            Expression::Call { function, args } => {
                let values = args
                    .iter()
                    .map(|arg| Self::eval(arg, context, input))
                    .collect::<Result<Vec<_>>>()?;
                functions::call(*function, &values)
            }
        }
    }

    /// `and`/`or` skip the right operand once the left decides the result
    fn eval_logic(
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
        context: &Context,
        input: Option<&Value>,
    ) -> Result<Value> {
        let l = operators::truth(op, &Self::eval(left, context, input)?)?;
        match (op, l) {
            (BinaryOperator::And, Some(false)) => return Ok(Value::Bool(false)),
            (BinaryOperator::Or, Some(true)) => return Ok(Value::Bool(true)),
            _ => {}
        }
        let r = operators::truth(op, &Self::eval(right, context, input)?)?;
        Ok(match op {
            BinaryOperator::And => operators::and(l, r),
            _ => operators::or(l, r),
        })
    }

    fn in_range(
        value: &Value,
        range: &Range,
        context: &Context,
        input: Option<&Value>,
    ) -> Result<Value> {
        let start = Self::eval(&range.start, context, input)?;
        let end = Self::eval(&range.end, context, input)?;
        let lower = if range.start_inclusive {
            Operator::Gte
        } else {
            Operator::Gt
        };
        let upper = if range.end_inclusive {
            Operator::Lte
        } else {
            Operator::Lt
        };
        Ok(Value::Bool(
            value.compare(lower, &start)? && value.compare(upper, &end)?,
        ))
    }
}
