//! Evaluation results and traces

pub mod evaluation;
pub mod trace;

pub use evaluation::{extend_unique, EvaluationResult, HitPolicyViolation, MatchedOutcome};
pub use trace::{CombinatorTrace, ConditionTrace, NodeTrace, RuleTrace};
