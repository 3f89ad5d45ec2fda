//! Parser error types

use thiserror::Error;
use verdict_core::{CoreError, StructuralError};

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML (or JSON) document error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Definition is malformed
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// Literal cannot be represented as a value
    #[error(transparent)]
    Value(#[from] CoreError),

    /// FEEL expression does not parse
    #[error("Expression syntax error at position {position} in '{input}': {message}")]
    ExpressionSyntax {
        input: String,
        position: usize,
        message: String,
    },
}

impl ParseError {
    pub(crate) fn missing_field(field: impl Into<String>) -> Self {
        ParseError::Structural(StructuralError::MissingField {
            field: field.into(),
        })
    }

    pub(crate) fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::Structural(StructuralError::InvalidValue {
            field: field.into(),
            message: message.into(),
        })
    }

    pub(crate) fn syntax(input: &str, position: usize, message: impl Into<String>) -> Self {
        ParseError::ExpressionSyntax {
            input: input.to_string(),
            position,
            message: message.into(),
        }
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
