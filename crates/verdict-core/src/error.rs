//! Error types for Verdict Core

use thiserror::Error;

/// Errors raised while operating on runtime values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Type mismatch: cannot apply '{operator}' to {left} and {right}")]
    TypeMismatch {
        operator: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),
}

/// Malformed rule set or decision table, detected before any evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Combinator '{kind}' expects {expected} child node(s), got {actual}")]
    InvalidArity {
        kind: String,
        expected: &'static str,
        actual: usize,
    },

    #[error("Duplicate id '{id}' in {scope}")]
    DuplicateId { id: String, scope: String },

    #[error("Weight {weight} of '{id}' is outside [0, 1]")]
    InvalidWeight { id: String, weight: f64 },

    #[error("Row '{row}' has {actual} {what} entries, table declares {expected}")]
    ShapeMismatch {
        row: String,
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
