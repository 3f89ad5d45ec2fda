//! Runtime error types

use thiserror::Error;
use verdict_core::CoreError;

/// Runtime error
///
/// Raised while evaluating a single expression. The engines absorb these
/// into traces instead of propagating them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Operator applied to incompatible value kinds
    #[error("Type error: {0}")]
    TypeMismatch(String),

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Field path not bound in the context
    #[error("Unbound reference: {0}")]
    UnboundReference(String),

    /// Built-in function called with an unusable argument
    #[error("Invalid argument to '{function}': {message}")]
    InvalidArgument { function: String, message: String },

    /// Value comparison failure
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
