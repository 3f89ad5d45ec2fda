//! Scoring strategies
//!
//! A strategy combines the `EvaluationResult`s of every evaluator an agent
//! runs into one `Decision`. Strategies never look at rule sets or tables
//! directly, so new ones can be added without touching the engines.

mod highest_weight;
mod unanimous;
mod weighted_average;

pub use highest_weight::HighestWeight;
pub use unanimous::Unanimous;
pub use weighted_average::WeightedAverage;

use crate::decision::Decision;
use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use std::fmt;
use verdict_runtime::result::extend_unique;
use verdict_runtime::EvaluationResult;

/// Label reported when no outcome can be chosen
pub const DEFAULT_NO_DECISION_LABEL: &str = "no_decision";

/// Confidences closer than this are treated as a tie
pub(crate) const CONFIDENCE_EPSILON: f64 = 1e-9;

/// Combines per-evaluator results into a single decision
pub trait ScoringStrategy: Send + Sync {
    /// Strategy name, used in logs
    fn name(&self) -> &str;

    /// Combine evaluation results, in evaluator order, into a decision
    fn combine(&self, results: Vec<EvaluationResult>) -> Result<Decision>;
}

/// What a label's summed weight is divided by under `WeightedAverage`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenominatorPolicy {
    /// Number of matched outcomes carrying the label (a mean weight)
    #[default]
    Contributors,

    /// Number of evaluation results; the confidence is clamped to 1
    TotalEvaluators,
}

/// How hit policy violations reported by decision tables are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationPolicy {
    /// Any violation turns the whole decision into `no_decision`
    #[default]
    NoDecision,

    /// Violating evaluators contribute nothing; the others still decide
    Ignore,

    /// `combine` returns `SdkError::HitPolicyViolation`
    Fail,
}

/// Strategy selector used by `ScoringConfig`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    WeightedAverage,
    HighestWeight,
    Unanimous,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::WeightedAverage => "weighted_average",
            StrategyKind::HighestWeight => "highest_weight",
            StrategyKind::Unanimous => "unanimous",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Violation screening and the no-decision fallback shared by all strategies
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Fallback {
    pub(crate) violation_policy: ViolationPolicy,
    pub(crate) label: String,
}

impl Default for Fallback {
    fn default() -> Self {
        Self {
            violation_policy: ViolationPolicy::default(),
            label: DEFAULT_NO_DECISION_LABEL.to_string(),
        }
    }
}

impl Fallback {
    /// Apply the violation policy.
    ///
    /// Returns the violation messages when the decision must fall back to
    /// `no_decision` before any scoring happens.
    pub(crate) fn screen(&self, results: &[EvaluationResult]) -> Result<Option<Vec<String>>> {
        let Some(first) = results.iter().find_map(|result| result.violation.as_ref()) else {
            return Ok(None);
        };

        match self.violation_policy {
            ViolationPolicy::Ignore => Ok(None),
            ViolationPolicy::Fail => Err(SdkError::HitPolicyViolation(first.clone())),
            ViolationPolicy::NoDecision => {
                let violations: Vec<String> = results
                    .iter()
                    .filter_map(|result| result.violation.as_ref())
                    .map(ToString::to_string)
                    .collect();
                tracing::warn!(
                    "{} hit policy violation(s), falling back to '{}'",
                    violations.len(),
                    self.label
                );
                Ok(Some(violations))
            }
        }
    }

    /// `no_decision` with confidence 0; `explanations` carries violation messages
    pub(crate) fn no_decision(
        &self,
        results: Vec<EvaluationResult>,
        explanations: Vec<String>,
    ) -> Decision {
        Decision::undecided(self.label.clone(), explanations, results)
    }

    /// Build the decision for a winning label
    pub(crate) fn decided(
        &self,
        label: String,
        confidence: f64,
        results: Vec<EvaluationResult>,
    ) -> Decision {
        let explanations = contributing_reasons(&label, &results);
        Decision::decided(label, confidence, explanations, results)
    }
}

/// Reasons of every matched outcome carrying `label`, deduplicated in order
fn contributing_reasons(label: &str, results: &[EvaluationResult]) -> Vec<String> {
    let mut reasons = Vec::new();
    for result in results {
        extend_unique(
            &mut reasons,
            result
                .matched_rules
                .iter()
                .filter(|outcome| outcome.decision == label && !outcome.reason.is_empty())
                .map(|outcome| outcome.reason.as_str()),
        );
    }
    reasons
}
