//! Verdict Runtime - evaluation engine for the Verdict decision engine
//!
//! This crate evaluates validated definitions against a context:
//! - Condition leaves and condition trees, traced without short-circuiting
//! - FEEL expressions and DMN unary tests
//! - Rule sets (`RuleEngine`) and decision tables (`DecisionTableEngine`)
//! - The `Evaluator` capability shared by both definition kinds
//!
//! Evaluation never fails as a whole: errors inside a condition or a cell
//! are recorded in its trace and the condition counts as false.

pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod result;

pub use context::Context;
pub use engine::{ConditionEvaluator, DecisionTableEngine, RuleEngine};
pub use error::{Result, RuntimeError};
pub use evaluator::{DecisionTableEvaluator, Evaluator, RuleSetEvaluator};
pub use expression::ExpressionEvaluator;
pub use result::{
    CombinatorTrace, ConditionTrace, EvaluationResult, HitPolicyViolation, MatchedOutcome,
    NodeTrace, RuleTrace,
};
