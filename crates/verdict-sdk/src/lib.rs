//! Verdict Decision Engine SDK
//!
//! High-level API for combining rule sets and decision tables into scored,
//! explained decisions.

pub mod agent;
pub mod builder;
pub mod config;
pub mod decision;
pub mod error;
pub mod explain;
pub mod scoring;

// Re-export main types
pub use agent::DecisionAgent;
pub use builder::DecisionAgentBuilder;
pub use config::{AgentConfig, ExplainConfig, ScoringConfig};
pub use decision::Decision;
pub use error::{Result, SdkError};
pub use explain::{
    ConditionExplanation, EvaluatorExplanation, Explainability, ExplanationReport,
    RuleExplanation, Verbosity,
};
pub use scoring::{
    DenominatorPolicy, HighestWeight, ScoringStrategy, StrategyKind, Unanimous, ViolationPolicy,
    WeightedAverage, DEFAULT_NO_DECISION_LABEL,
};

// Re-export commonly used types from dependencies
pub use verdict_core::Value;
pub use verdict_runtime::{
    Context, DecisionTableEvaluator, EvaluationResult, Evaluator, RuleSetEvaluator,
};
