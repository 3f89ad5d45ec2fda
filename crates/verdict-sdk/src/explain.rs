//! Explainability
//!
//! `Explainability` is the summary attached to every `Decision`; an
//! `ExplanationReport` is the rendering handed to callers, terse or verbose.

use serde::{Deserialize, Serialize};
use verdict_core::Value;
use verdict_runtime::result::extend_unique;
use verdict_runtime::{ConditionTrace, EvaluationResult, RuleTrace};

/// Why the decision was reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explainability {
    pub decision: String,

    /// Passed conditions of the evaluators that support the decision
    pub because: Vec<String>,

    /// Failed conditions of the same evaluators, or of every evaluator when
    /// nothing was decided
    pub failed_conditions: Vec<String>,
}

impl Explainability {
    /// Union the `because` and `failed_conditions` lists of every evaluator
    /// whose matched outcomes include `decision`, in evaluator order.
    pub fn assemble(decision: &str, results: &[EvaluationResult]) -> Self {
        let mut because = Vec::new();
        let mut failed_conditions = Vec::new();
        for result in results.iter().filter(|result| result.supports(decision)) {
            extend_unique(&mut because, &result.because);
            extend_unique(&mut failed_conditions, &result.failed_conditions);
        }

        Self {
            decision: decision.to_string(),
            because,
            failed_conditions,
        }
    }

    /// Explanation of a fallback decision: nothing supports it, and every
    /// evaluator's failed conditions are listed.
    pub fn undecided(label: &str, results: &[EvaluationResult]) -> Self {
        let mut failed_conditions = Vec::new();
        for result in results {
            extend_unique(&mut failed_conditions, &result.failed_conditions);
        }

        Self {
            decision: label.to_string(),
            because: Vec::new(),
            failed_conditions,
        }
    }
}

/// Level of detail of an `ExplanationReport`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Description strings only
    #[default]
    Terse,

    /// Adds per-evaluator rule traces with actual and expected values
    Verbose,
}

/// Caller-facing explanation of a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationReport {
    pub decision: String,
    pub confidence: f64,
    pub explanations: Vec<String>,
    pub because: Vec<String>,
    pub failed_conditions: Vec<String>,

    /// Present in verbose reports only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub evaluators: Option<Vec<EvaluatorExplanation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorExplanation {
    pub evaluator: String,
    pub matched_rules: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub violation: Option<String>,

    pub rules: Vec<RuleExplanation>,
}

impl EvaluatorExplanation {
    pub fn from_result(result: &EvaluationResult) -> Self {
        Self {
            evaluator: result.evaluator_name.clone(),
            matched_rules: result
                .matched_rules
                .iter()
                .map(|outcome| outcome.rule_id.clone())
                .collect(),
            violation: result.violation.as_ref().map(ToString::to_string),
            rules: result.rule_traces.iter().map(RuleExplanation::from_trace).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleExplanation {
    pub rule_id: String,
    pub matched: bool,
    pub decision: String,
    pub conditions: Vec<ConditionExplanation>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl RuleExplanation {
    fn from_trace(trace: &RuleTrace) -> Self {
        Self {
            rule_id: trace.rule_id.clone(),
            matched: trace.matched,
            decision: trace.decision.clone(),
            conditions: trace
                .condition_trace
                .leaves()
                .into_iter()
                .map(ConditionExplanation::from_trace)
                .collect(),
            error: trace.error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionExplanation {
    pub description: String,
    pub result: bool,
    pub actual_value: Value,
    pub expected_value: Value,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ConditionExplanation {
    fn from_trace(trace: &ConditionTrace) -> Self {
        Self {
            description: trace.description.clone(),
            result: trace.result,
            actual_value: trace.actual_value.clone(),
            expected_value: trace.expected_value.clone(),
            error: trace.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, decision: Option<&str>, because: &[&str], failed: &[&str]) -> EvaluationResult {
        let mut result = EvaluationResult::assemble(name, Vec::new(), &[]);
        if let Some(decision) = decision {
            result.matched_rules.push(verdict_runtime::MatchedOutcome {
                rule_id: format!("{}_rule", name),
                decision: decision.to_string(),
                weight: 1.0,
                reason: String::new(),
            });
        }
        result.because = because.iter().map(|s| s.to_string()).collect();
        result.failed_conditions = failed.iter().map(|s| s.to_string()).collect();
        result
    }

    #[test]
    fn test_only_supporting_evaluators() {
        let results = vec![
            result("a", Some("approved"), &["x > 1", "y = 2"], &["z < 0"]),
            result("b", Some("denied"), &["w is present"], &["v = 1"]),
            result("c", Some("approved"), &["y = 2", "k != 3"], &["z < 0", "m > 9"]),
        ];
        let explainability = Explainability::assemble("approved", &results);

        assert_eq!(explainability.decision, "approved");
        assert_eq!(explainability.because, vec!["x > 1", "y = 2", "k != 3"]);
        assert_eq!(explainability.failed_conditions, vec!["z < 0", "m > 9"]);
    }

    #[test]
    fn test_no_decision_lists_every_failure() {
        let results = vec![
            result("a", None, &[], &["x > 1"]),
            result("b", None, &[], &["y = 2", "x > 1"]),
        ];
        let explainability = Explainability::undecided("no_decision", &results);

        assert!(explainability.because.is_empty());
        assert_eq!(explainability.failed_conditions, vec!["x > 1", "y = 2"]);
    }

    #[test]
    fn test_verbosity_default() {
        assert_eq!(Verbosity::default(), Verbosity::Terse);
        let verbosity: Verbosity = serde_yaml::from_str("verbose").unwrap();
        assert_eq!(verbosity, Verbosity::Verbose);
    }
}
