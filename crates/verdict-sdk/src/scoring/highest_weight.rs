//! Highest-weight-wins scoring

use super::{Fallback, ScoringStrategy, ViolationPolicy, CONFIDENCE_EPSILON};
use crate::decision::Decision;
use crate::error::Result;
use verdict_runtime::EvaluationResult;

/// The single heaviest matched outcome decides; its weight is the confidence
#[derive(Debug, Clone, Default)]
pub struct HighestWeight {
    fallback: Fallback,
}

impl HighestWeight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_violation_policy(mut self, policy: ViolationPolicy) -> Self {
        self.fallback.violation_policy = policy;
        self
    }

    pub fn with_no_decision_label(mut self, label: impl Into<String>) -> Self {
        self.fallback.label = label.into();
        self
    }
}

impl ScoringStrategy for HighestWeight {
    fn name(&self) -> &str {
        "highest_weight"
    }

    fn combine(&self, results: Vec<EvaluationResult>) -> Result<Decision> {
        if let Some(violations) = self.fallback.screen(&results)? {
            return Ok(self.fallback.no_decision(results, violations));
        }

        let mut best: Option<(&str, f64)> = None;
        for outcome in results.iter().flat_map(|result| &result.matched_rules) {
            if best.map_or(true, |(_, weight)| outcome.weight > weight + CONFIDENCE_EPSILON) {
                best = Some((outcome.decision.as_str(), outcome.weight));
            }
        }

        let winner = best.map(|(label, weight)| (label.to_string(), weight));
        Ok(match winner {
            Some((label, weight)) => self.fallback.decided(label, weight, results),
            None => self.fallback.no_decision(results, Vec::new()),
        })
    }
}
