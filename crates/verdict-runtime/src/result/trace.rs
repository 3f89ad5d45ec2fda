//! Evaluation traces
//!
//! Every evaluated leaf condition, decision table cell, combinator and rule
//! leaves a trace. Traces are owned snapshots and are never mutated once the
//! evaluation that produced them returns.

use serde::{Deserialize, Serialize};
use verdict_core::ast::{CombinatorKind, Condition, Operator};
use verdict_core::Value;

/// Trace of a single leaf condition or decision table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTrace {
    /// Field path, or the input column label for table cells
    pub field: String,

    /// Condition operator; `None` for free-form FEEL cells
    pub operator: Option<Operator>,

    /// Expected value as written in the definition
    pub expected_value: Value,

    /// Value found in the context (or computed by the input expression)
    pub actual_value: Value,

    /// The evaluation result
    pub result: bool,

    /// Fixed human-readable description (e.g. `risk_score < 0.7`)
    pub description: String,

    /// Type mismatch or evaluation failure that forced `result` to false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConditionTrace {
    /// Create a new condition trace
    pub fn new(
        field: impl Into<String>,
        operator: Option<Operator>,
        expected_value: Value,
        actual_value: Value,
        result: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            expected_value,
            actual_value,
            result,
            description: description.into(),
            error: None,
        }
    }

    /// Trace of a leaf condition
    pub fn for_condition(condition: &Condition, actual_value: Value, result: bool) -> Self {
        Self::new(
            condition.field.clone(),
            Some(condition.operator),
            condition.expected.clone(),
            actual_value,
            result,
            condition.description(),
        )
    }

    /// Record an evaluation failure; the condition counts as false
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.result = false;
        self.error = Some(error.into());
        self
    }
}

/// Trace of an `all`/`any`/`not` node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinatorTrace {
    pub kind: CombinatorKind,
    pub result: bool,

    /// One trace per child, in declaration order
    pub children: Vec<NodeTrace>,
}

impl CombinatorTrace {
    pub fn new(kind: CombinatorKind, children: Vec<NodeTrace>, result: bool) -> Self {
        Self {
            kind,
            result,
            children,
        }
    }
}

/// Trace of any condition tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeTrace {
    Condition(ConditionTrace),
    Combinator(CombinatorTrace),
}

impl NodeTrace {
    pub fn result(&self) -> bool {
        match self {
            NodeTrace::Condition(trace) => trace.result,
            NodeTrace::Combinator(trace) => trace.result,
        }
    }

    /// Leaf traces in evaluation order
    pub fn leaves(&self) -> Vec<&ConditionTrace> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a ConditionTrace>) {
        match self {
            NodeTrace::Condition(trace) => leaves.push(trace),
            NodeTrace::Combinator(trace) => {
                for child in &trace.children {
                    child.collect_leaves(leaves);
                }
            }
        }
    }

    /// Descriptions of leaves that evaluated true
    pub fn passed_descriptions(&self) -> Vec<&str> {
        self.leaves()
            .into_iter()
            .filter(|leaf| leaf.result)
            .map(|leaf| leaf.description.as_str())
            .collect()
    }

    /// Descriptions of leaves that evaluated false
    pub fn failed_descriptions(&self) -> Vec<&str> {
        self.leaves()
            .into_iter()
            .filter(|leaf| !leaf.result)
            .map(|leaf| leaf.description.as_str())
            .collect()
    }
}

impl From<ConditionTrace> for NodeTrace {
    fn from(trace: ConditionTrace) -> Self {
        NodeTrace::Condition(trace)
    }
}

impl From<CombinatorTrace> for NodeTrace {
    fn from(trace: CombinatorTrace) -> Self {
        NodeTrace::Combinator(trace)
    }
}

/// Trace of a single rule or decision table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTrace {
    /// Rule ID (row ID for decision tables)
    pub rule_id: String,

    /// Whether the rule matched
    pub matched: bool,

    /// Condition tree trace; for table rows an `all` over the row's cells
    pub condition_trace: NodeTrace,

    /// Decision label the rule produces when it matches
    pub decision: String,

    pub weight: f64,

    pub reason: String,

    /// Row priority (decision tables only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    /// Evaluated row outputs (decision tables only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,

    /// Evaluation failure that prevented the rule from matching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuleTrace {
    /// Create a rule trace; the rule matches iff its condition trace is true
    pub fn new(rule_id: impl Into<String>, condition_trace: NodeTrace) -> Self {
        Self {
            rule_id: rule_id.into(),
            matched: condition_trace.result(),
            condition_trace,
            decision: String::new(),
            weight: 0.0,
            reason: String::new(),
            priority: None,
            output: None,
            error: None,
        }
    }

    /// Set the outcome the rule backs
    pub fn with_outcome(
        mut self,
        decision: impl Into<String>,
        weight: f64,
        reason: impl Into<String>,
    ) -> Self {
        self.decision = decision.into();
        self.weight = weight;
        self.reason = reason.into();
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_output(mut self, output: Value) -> Self {
        self.output = Some(output);
        self
    }

    /// Record a failure; the rule does not match
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.matched = false;
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(description: &str, result: bool) -> NodeTrace {
        ConditionTrace::new("f", Some(Operator::Eq), Value::Missing, Value::Missing, result, description)
            .into()
    }

    #[test]
    fn test_leaf_collection_order() {
        let tree: NodeTrace = CombinatorTrace::new(
            CombinatorKind::All,
            vec![
                leaf("a", true),
                CombinatorTrace::new(CombinatorKind::Any, vec![leaf("b", false), leaf("c", true)], true)
                    .into(),
                leaf("d", false),
            ],
            false,
        )
        .into();

        assert_eq!(tree.leaves().len(), 4);
        assert_eq!(tree.passed_descriptions(), vec!["a", "c"]);
        assert_eq!(tree.failed_descriptions(), vec!["b", "d"]);
        assert!(!tree.result());
    }

    #[test]
    fn test_error_forces_false() {
        let trace = ConditionTrace::new("x", Some(Operator::Gt), Value::from(1), Value::from(vec![1]), true, "x > 1")
            .with_error("type mismatch");
        assert!(!trace.result);
        assert_eq!(trace.error.as_deref(), Some("type mismatch"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(leaf("x = 1", true)).unwrap();
        assert_eq!(json["type"], "condition");
        assert_eq!(json["description"], "x = 1");
        assert_eq!(json["operator"], "eq");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_rule_trace_error_unmatches() {
        let trace = RuleTrace::new("r1", leaf("a", true))
            .with_outcome("approved", 0.5, "ok")
            .with_error("output failed");
        assert!(!trace.matched);
        assert_eq!(trace.decision, "approved");
    }
}
