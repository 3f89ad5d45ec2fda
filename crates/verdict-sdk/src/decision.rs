//! The final decision

use crate::explain::{EvaluatorExplanation, Explainability, ExplanationReport, Verbosity};
use serde::Serialize;
use verdict_runtime::EvaluationResult;

/// Outcome of one `decide` call.
///
/// Built once by a scoring strategy and read-only afterwards. Serializing it
/// gives the full structural dump, traces included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    decision: String,
    confidence: f64,
    decided: bool,
    explanations: Vec<String>,
    evaluations: Vec<EvaluationResult>,
    explainability: Explainability,
}

impl Decision {
    /// A label chosen by scoring
    pub(crate) fn decided(
        decision: String,
        confidence: f64,
        explanations: Vec<String>,
        evaluations: Vec<EvaluationResult>,
    ) -> Self {
        let explainability = Explainability::assemble(&decision, &evaluations);
        Self {
            decision,
            confidence,
            decided: true,
            explanations,
            evaluations,
            explainability,
        }
    }

    /// The fallback label with confidence 0
    pub(crate) fn undecided(
        label: String,
        explanations: Vec<String>,
        evaluations: Vec<EvaluationResult>,
    ) -> Self {
        let explainability = Explainability::undecided(&label, &evaluations);
        Self {
            decision: label,
            confidence: 0.0,
            decided: false,
            explanations,
            evaluations,
            explainability,
        }
    }

    /// Winning label
    pub fn decision(&self) -> &str {
        &self.decision
    }

    /// False when the fallback label was reported because no outcome could
    /// be chosen
    pub fn is_decided(&self) -> bool {
        self.decided
    }

    /// Confidence in [0, 1]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Reasons of the contributing rules, or violation messages
    pub fn explanations(&self) -> &[String] {
        &self.explanations
    }

    /// Results of every evaluator, in evaluator order
    pub fn evaluations(&self) -> &[EvaluationResult] {
        &self.evaluations
    }

    pub fn because(&self) -> &[String] {
        &self.explainability.because
    }

    pub fn failed_conditions(&self) -> &[String] {
        &self.explainability.failed_conditions
    }

    pub fn explainability(&self) -> &Explainability {
        &self.explainability
    }

    /// Render an explanation report at the given verbosity
    pub fn report(&self, verbosity: Verbosity) -> ExplanationReport {
        let evaluators = match verbosity {
            Verbosity::Terse => None,
            Verbosity::Verbose => Some(
                self.evaluations
                    .iter()
                    .map(EvaluatorExplanation::from_result)
                    .collect(),
            ),
        };

        ExplanationReport {
            decision: self.decision.clone(),
            confidence: self.confidence,
            explanations: self.explanations.clone(),
            because: self.explainability.because.clone(),
            failed_conditions: self.explainability.failed_conditions.clone(),
            evaluators,
        }
    }
}
