//! SDK error types

use thiserror::Error;
use verdict_runtime::HitPolicyViolation;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Definition could not be parsed or failed validation
    #[error("Parser error: {0}")]
    ParseError(#[from] verdict_parser::ParseError),

    /// Context could not be built
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] verdict_runtime::RuntimeError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed configuration document
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Raised by scoring under `ViolationPolicy::Fail`
    #[error(transparent)]
    HitPolicyViolation(#[from] HitPolicyViolation),

    /// An agent needs at least one evaluator
    #[error("Decision agent has no evaluators")]
    NoEvaluators,
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
