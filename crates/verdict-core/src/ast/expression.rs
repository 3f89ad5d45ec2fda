//! FEEL expression AST nodes
//!
//! Expressions appear in decision table cells. They are pure: evaluation
//! only reads the context and, for unary tests, the column's input value
//! (written `?`).

use super::operator::Operator;
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal value
    Literal(Value),

    /// List literal (e.g., `["gold", "silver"]`)
    List(Vec<Expression>),

    /// Range literal (e.g., `[18..65)`); only meaningful on the right of `in`
    Range(Box<Range>),

    /// Field path (e.g., customer.age)
    Path(Vec<String>),

    /// The input value of the enclosing decision table column (`?`)
    Input,

    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Binary operation
    Binary {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    /// Built-in function call
    Call {
        function: BuiltinFunction,
        args: Vec<Expression>,
    },
}

/// Range bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: Expression,
    pub end: Expression,
    pub start_inclusive: bool,
    pub end_inclusive: bool,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// Logical NOT (`not`)
    Not,
    /// Arithmetic negation (`-`)
    Negate,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Eq => "=",
            BinaryOperator::Neq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Gte => ">=",
            BinaryOperator::In => "in",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }

    /// Binding strength, higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::In => 3,
            BinaryOperator::Eq
            | BinaryOperator::Neq
            | BinaryOperator::Lt
            | BinaryOperator::Lte
            | BinaryOperator::Gt
            | BinaryOperator::Gte => 4,
            BinaryOperator::Add | BinaryOperator::Sub => 5,
            BinaryOperator::Mul | BinaryOperator::Div => 6,
        }
    }

    /// The condition operator with the same meaning, if any
    pub fn as_condition_operator(self) -> Option<Operator> {
        match self {
            BinaryOperator::Eq => Some(Operator::Eq),
            BinaryOperator::Neq => Some(Operator::Neq),
            BinaryOperator::Lt => Some(Operator::Lt),
            BinaryOperator::Lte => Some(Operator::Lte),
            BinaryOperator::Gt => Some(Operator::Gt),
            BinaryOperator::Gte => Some(Operator::Gte),
            BinaryOperator::In => Some(Operator::In),
            _ => None,
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div
        )
    }
}

/// Built-in functions available to FEEL expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuiltinFunction {
    StringLength,
    UpperCase,
    LowerCase,
    Substring,
    Contains,
    StartsWith,
    EndsWith,
    ListContains,
    Count,
    Sum,
    Min,
    Max,
    Abs,
    Floor,
    Ceiling,
}

impl BuiltinFunction {
    const ALL: [BuiltinFunction; 15] = [
        BuiltinFunction::StringLength,
        BuiltinFunction::UpperCase,
        BuiltinFunction::LowerCase,
        BuiltinFunction::Substring,
        BuiltinFunction::Contains,
        BuiltinFunction::StartsWith,
        BuiltinFunction::EndsWith,
        BuiltinFunction::ListContains,
        BuiltinFunction::Count,
        BuiltinFunction::Sum,
        BuiltinFunction::Min,
        BuiltinFunction::Max,
        BuiltinFunction::Abs,
        BuiltinFunction::Floor,
        BuiltinFunction::Ceiling,
    ];

    /// FEEL name; multi-word names are separated by single spaces
    pub fn name(self) -> &'static str {
        match self {
            BuiltinFunction::StringLength => "string length",
            BuiltinFunction::UpperCase => "upper case",
            BuiltinFunction::LowerCase => "lower case",
            BuiltinFunction::Substring => "substring",
            BuiltinFunction::Contains => "contains",
            BuiltinFunction::StartsWith => "starts with",
            BuiltinFunction::EndsWith => "ends with",
            BuiltinFunction::ListContains => "list contains",
            BuiltinFunction::Count => "count",
            BuiltinFunction::Sum => "sum",
            BuiltinFunction::Min => "min",
            BuiltinFunction::Max => "max",
            BuiltinFunction::Abs => "abs",
            BuiltinFunction::Floor => "floor",
            BuiltinFunction::Ceiling => "ceiling",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Accepted argument count as (min, max); `None` means unbounded
    pub fn arity(self) -> (usize, Option<usize>) {
        match self {
            BuiltinFunction::StringLength
            | BuiltinFunction::UpperCase
            | BuiltinFunction::LowerCase
            | BuiltinFunction::Count
            | BuiltinFunction::Sum
            | BuiltinFunction::Abs
            | BuiltinFunction::Floor
            | BuiltinFunction::Ceiling => (1, Some(1)),
            BuiltinFunction::Contains
            | BuiltinFunction::StartsWith
            | BuiltinFunction::EndsWith
            | BuiltinFunction::ListContains => (2, Some(2)),
            BuiltinFunction::Substring => (2, Some(3)),
            BuiltinFunction::Min | BuiltinFunction::Max => (1, None),
        }
    }
}

const UNARY_PRECEDENCE: u8 = 7;
const PRIMARY_PRECEDENCE: u8 = 8;

impl Expression {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Create a field path expression from a dotted path
    pub fn path(path: &str) -> Self {
        Expression::Path(path.split('.').map(str::to_string).collect())
    }

    /// Create a binary expression
    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create a unary expression
    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a range expression
    pub fn range(start: Expression, end: Expression, start_inclusive: bool, end_inclusive: bool) -> Self {
        Expression::Range(Box::new(Range {
            start,
            end,
            start_inclusive,
            end_inclusive,
        }))
    }

    /// Returns true if the expression reads the column input (`?`)
    pub fn references_input(&self) -> bool {
        match self {
            Expression::Input => true,
            Expression::Literal(_) | Expression::Path(_) => false,
            Expression::List(items) => items.iter().any(Expression::references_input),
            Expression::Range(range) => {
                range.start.references_input() || range.end.references_input()
            }
            Expression::Unary { operand, .. } => operand.references_input(),
            Expression::Binary { left, right, .. } => {
                left.references_input() || right.references_input()
            }
            Expression::Call { args, .. } => args.iter().any(Expression::references_input),
        }
    }

    /// Render the expression with `?` replaced by `subject`
    pub fn render_with_subject(&self, subject: &str) -> String {
        let mut out = String::new();
        self.render_into(&mut out, Some(subject), 0);
        out
    }

    fn precedence(&self) -> u8 {
        match self {
            Expression::Binary { op, .. } => op.precedence(),
            Expression::Unary { .. } => UNARY_PRECEDENCE,
            _ => PRIMARY_PRECEDENCE,
        }
    }

    fn render_into(&self, out: &mut String, subject: Option<&str>, parent: u8) {
        let wrap = self.precedence() < parent;
        if wrap {
            out.push('(');
        }
        match self {
            Expression::Literal(value) => out.push_str(&value.render()),
            Expression::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.render_into(out, subject, 0);
                }
                out.push(']');
            }
            Expression::Range(range) => {
                out.push(if range.start_inclusive { '[' } else { '(' });
                range.start.render_into(out, subject, 0);
                out.push_str("..");
                range.end.render_into(out, subject, 0);
                out.push(if range.end_inclusive { ']' } else { ')' });
            }
            Expression::Path(segments) => out.push_str(&segments.join(".")),
            Expression::Input => out.push_str(subject.unwrap_or("?")),
            Expression::Unary { op, operand } => match op {
                UnaryOperator::Not => {
                    out.push_str("not(");
                    operand.render_into(out, subject, 0);
                    out.push(')');
                }
                UnaryOperator::Negate => {
                    out.push('-');
                    operand.render_into(out, subject, UNARY_PRECEDENCE);
                }
            },
            Expression::Binary { left, op, right } => {
                let precedence = op.precedence();
                left.render_into(out, subject, precedence);
                out.push(' ');
                out.push_str(op.symbol());
                out.push(' ');
                right.render_into(out, subject, precedence + 1);
            }
            Expression::Call { function, args } => {
                out.push_str(function.name());
                out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.render_into(out, subject, 0);
                }
                out.push(')');
            }
        }
        if wrap {
            out.push(')');
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render_into(&mut out, None, 0);
        f.write_str(&out)
    }
}
