//! Unanimous-required scoring

use super::{Fallback, ScoringStrategy, ViolationPolicy};
use crate::decision::Decision;
use crate::error::Result;
use verdict_runtime::EvaluationResult;

/// Every evaluator must match and every matched outcome must carry the same
/// label. The confidence is the mean outcome weight.
#[derive(Debug, Clone, Default)]
pub struct Unanimous {
    fallback: Fallback,
}

impl Unanimous {
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

    fn agreed_label(results: &[EvaluationResult]) -> Option<(String, f64)> {
        if results.is_empty() || !results.iter().all(EvaluationResult::has_match) {
            return None;
        }

        let mut outcomes = results.iter().flat_map(|result| &result.matched_rules);
        let first = outcomes.next()?;
        let mut sum = first.weight;
        let mut count = 1usize;
        for outcome in outcomes {
            if outcome.decision != first.decision {
                return None;
            }
            sum += outcome.weight;
            count += 1;
        }
        Some((first.decision.clone(), sum / count as f64))
    }
}

impl ScoringStrategy for Unanimous {
    fn name(&self) -> &str {
        "unanimous"
    }

    fn combine(&self, results: Vec<EvaluationResult>) -> Result<Decision> {
        if let Some(violations) = self.fallback.screen(&results)? {
            return Ok(self.fallback.no_decision(results, violations));
        }

        Ok(match Self::agreed_label(&results) {
            Some((label, confidence)) => self.fallback.decided(label, confidence, results),
            None => {
                tracing::debug!("evaluators did not agree");
                self.fallback.no_decision(results, Vec::new())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::result;

    #[test]
    fn test_agreement() {
        let decision = Unanimous::new()
            .combine(vec![
                result("a", &[("approved", 0.9)]),
                result("b", &[("approved", 0.7)]),
            ])
            .unwrap();
        assert_eq!(decision.decision(), "approved");
        assert!((decision.confidence() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_disagreement() {
        let decision = Unanimous::new()
            .combine(vec![
                result("a", &[("approved", 0.9)]),
                result("b", &[("denied", 0.7)]),
            ])
            .unwrap();
        assert_eq!(decision.decision(), "no_decision");
    }

    #[test]
    fn test_silent_evaluator_blocks() {
        let decision = Unanimous::new()
            .combine(vec![result("a", &[("approved", 0.9)]), result("b", &[])])
            .unwrap();
        assert_eq!(decision.decision(), "no_decision");
        assert_eq!(decision.confidence(), 0.0);
    }
}
