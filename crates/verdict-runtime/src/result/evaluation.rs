//! Per-evaluator results

use super::trace::RuleTrace;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use verdict_core::ast::HitPolicy;
use verdict_core::Value;

/// Outcome of a rule (or table row) that matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedOutcome {
    pub rule_id: String,
    pub decision: String,
    pub weight: f64,
    pub reason: String,
}

impl MatchedOutcome {
    fn from_trace(trace: &RuleTrace) -> Self {
        Self {
            rule_id: trace.rule_id.clone(),
            decision: trace.decision.clone(),
            weight: trace.weight,
            reason: trace.reason.clone(),
        }
    }
}

/// A decision table's hit policy contract was broken by the matching rows
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("Hit policy '{hit_policy}' violated in '{table}': {message}")]
pub struct HitPolicyViolation {
    pub hit_policy: HitPolicy,
    pub table: String,
    pub matched_rows: Vec<String>,
    pub message: String,
}

/// Everything one evaluator produced for one context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Rule set or decision table ID
    pub evaluator_name: String,

    /// Selected outcomes, in rule order
    pub matched_rules: Vec<MatchedOutcome>,

    /// One trace per rule or row, in declaration order
    pub rule_traces: Vec<RuleTrace>,

    /// Passed condition descriptions of the selected rules, deduplicated
    pub because: Vec<String>,

    /// Failed condition descriptions of all rules, deduplicated
    pub failed_conditions: Vec<String>,

    /// Set when a decision table's hit policy was violated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<HitPolicyViolation>,

    /// Decision table output (a list under the `collect` hit policy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

impl EvaluationResult {
    /// Build a result from rule traces and the indices of selected traces
    pub fn assemble(
        evaluator_name: impl Into<String>,
        rule_traces: Vec<RuleTrace>,
        selected: &[usize],
    ) -> Self {
        let mut matched_rules = Vec::with_capacity(selected.len());
        let mut because = Vec::new();
        for trace in selected.iter().filter_map(|&i| rule_traces.get(i)) {
            matched_rules.push(MatchedOutcome::from_trace(trace));
            extend_unique(&mut because, trace.condition_trace.passed_descriptions());
        }

        let mut failed_conditions = Vec::new();
        for trace in &rule_traces {
            extend_unique(&mut failed_conditions, trace.condition_trace.failed_descriptions());
        }

        Self {
            evaluator_name: evaluator_name.into(),
            matched_rules,
            rule_traces,
            because,
            failed_conditions,
            violation: None,
            output: None,
        }
    }

    pub fn with_violation(mut self, violation: HitPolicyViolation) -> Self {
        self.violation = Some(violation);
        self
    }

    pub fn with_output(mut self, output: Value) -> Self {
        self.output = Some(output);
        self
    }

    /// True if at least one outcome was selected
    pub fn has_match(&self) -> bool {
        !self.matched_rules.is_empty()
    }

    /// True if any selected outcome carries `label`
    pub fn supports(&self, label: &str) -> bool {
        self.matched_rules.iter().any(|outcome| outcome.decision == label)
    }
}

/// Append items not already present, keeping first-occurrence order
pub fn extend_unique<S: AsRef<str>>(target: &mut Vec<String>, items: impl IntoIterator<Item = S>) {
    for item in items {
        let item = item.as_ref();
        if !target.iter().any(|existing| existing == item) {
            target.push(item.to_string());
        }
    }
}
