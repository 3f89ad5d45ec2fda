//! Weighted-average scoring

use super::{DenominatorPolicy, Fallback, ScoringStrategy, ViolationPolicy, CONFIDENCE_EPSILON};
use crate::decision::Decision;
use crate::error::Result;
use verdict_runtime::EvaluationResult;

/// Per label, the summed outcome weight divided by the denominator policy.
/// The highest confidence wins; ties go to the label seen first.
#[derive(Debug, Clone, Default)]
pub struct WeightedAverage {
    denominator: DenominatorPolicy,
    fallback: Fallback,
}

/// Running total for one label
struct Tally {
    label: String,
    sum: f64,
    contributors: usize,
}

impl WeightedAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_denominator(mut self, denominator: DenominatorPolicy) -> Self {
        self.denominator = denominator;
        self
    }

    pub fn with_violation_policy(mut self, policy: ViolationPolicy) -> Self {
        self.fallback.violation_policy = policy;
        self
    }

    pub fn with_no_decision_label(mut self, label: impl Into<String>) -> Self {
        self.fallback.label = label.into();
        self
    }

    pub fn denominator(&self) -> DenominatorPolicy {
        self.denominator
    }

    fn tally(results: &[EvaluationResult]) -> Vec<Tally> {
        let mut tallies: Vec<Tally> = Vec::new();
        for outcome in results.iter().flat_map(|result| &result.matched_rules) {
            match tallies.iter_mut().find(|tally| tally.label == outcome.decision) {
                Some(tally) => {
                    tally.sum += outcome.weight;
                    tally.contributors += 1;
                }
                None => tallies.push(Tally {
                    label: outcome.decision.clone(),
                    sum: outcome.weight,
                    contributors: 1,
                }),
            }
        }
        tallies
    }

    fn confidence(&self, tally: &Tally, evaluators: usize) -> f64 {
        match self.denominator {
            DenominatorPolicy::Contributors => tally.sum / tally.contributors as f64,
            DenominatorPolicy::TotalEvaluators => (tally.sum / evaluators.max(1) as f64).min(1.0),
        }
    }
}

impl ScoringStrategy for WeightedAverage {
    fn name(&self) -> &str {
        "weighted_average"
    }

    fn combine(&self, results: Vec<EvaluationResult>) -> Result<Decision> {
        if let Some(violations) = self.fallback.screen(&results)? {
            return Ok(self.fallback.no_decision(results, violations));
        }

        let mut best: Option<(String, f64)> = None;
        for tally in Self::tally(&results) {
            let confidence = self.confidence(&tally, results.len());
            tracing::debug!("label '{}' scored {:.4}", tally.label, confidence);
            let better = match &best {
                Some((_, best_confidence)) => confidence > best_confidence + CONFIDENCE_EPSILON,
                None => true,
            };
            if better {
                best = Some((tally.label, confidence));
            }
        }

        Ok(match best {
            Some((label, confidence)) => self.fallback.decided(label, confidence, results),
            None => self.fallback.no_decision(results, Vec::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::{result, violated};

    fn example_five() -> Vec<EvaluationResult> {
        vec![
            result("a", &[("approved", 0.9)]),
            result("b", &[("approved", 0.7)]),
            result("c", &[("denied", 0.95)]),
        ]
    }

    #[test]
    fn test_contributors_denominator() {
        let decision = WeightedAverage::new().combine(example_five()).unwrap();
        assert_eq!(decision.decision(), "denied");
        assert!((decision.confidence() - 0.95).abs() < 1e-9);
        assert_eq!(decision.explanations(), ["c says denied"]);
    }

    #[test]
    fn test_total_evaluators_denominator() {
        let strategy = WeightedAverage::new().with_denominator(DenominatorPolicy::TotalEvaluators);
        let decision = strategy.combine(example_five()).unwrap();
        assert_eq!(decision.decision(), "approved");
        assert!((decision.confidence() - 1.6 / 3.0).abs() < 1e-9);
        assert_eq!(decision.explanations(), ["a says approved", "b says approved"]);
    }

    #[test]
    fn test_total_evaluators_clamps() {
        let strategy = WeightedAverage::new().with_denominator(DenominatorPolicy::TotalEvaluators);
        let decision = strategy
            .combine(vec![result("collect", &[("ok", 1.0), ("ok", 1.0)])])
            .unwrap();
        assert_eq!(decision.confidence(), 1.0);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let decision = WeightedAverage::new()
            .combine(vec![
                result("a", &[("review", 0.5)]),
                result("b", &[("approved", 0.5)]),
            ])
            .unwrap();
        assert_eq!(decision.decision(), "review");
    }

    #[test]
    fn test_no_match_is_no_decision() {
        let decision = WeightedAverage::new()
            .with_no_decision_label("undecided")
            .combine(vec![result("a", &[]), result("b", &[])])
            .unwrap();
        assert_eq!(decision.decision(), "undecided");
        assert_eq!(decision.confidence(), 0.0);
        assert!(decision.explanations().is_empty());
    }

    #[test]
    fn test_violation_policies() {
        let results = || vec![result("a", &[("approved", 0.9)]), violated("table")];

        let decision = WeightedAverage::new().combine(results()).unwrap();
        assert_eq!(decision.decision(), "no_decision");

        let decision = WeightedAverage::new()
            .with_violation_policy(ViolationPolicy::Ignore)
            .combine(results())
            .unwrap();
        assert_eq!(decision.decision(), "approved");
        assert!((decision.confidence() - 0.9).abs() < 1e-9);

        assert!(WeightedAverage::new()
            .with_violation_policy(ViolationPolicy::Fail)
            .combine(results())
            .is_err());
    }
}
