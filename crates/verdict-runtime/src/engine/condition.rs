//! Condition and condition tree evaluation
//!
//! Combinators never short-circuit: every child is evaluated and traced so
//! explanations cover conditions that did not decide the outcome.

use crate::context::Context;
use crate::result::{CombinatorTrace, ConditionTrace, NodeTrace};
use verdict_core::ast::{CombinatorKind, Condition, ConditionNode};

/// Evaluates leaf conditions and condition trees
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Evaluate a leaf condition. Always produces a trace; a type mismatch
    /// yields `result = false` with the error recorded.
    pub fn evaluate(condition: &Condition, context: &Context) -> ConditionTrace {
        let actual = context.get(&condition.field).clone();
        match actual.compare(condition.operator, &condition.expected) {
            Ok(result) => ConditionTrace::for_condition(condition, actual, result),
            Err(e) => {
                tracing::debug!(
                    field = %condition.field,
                    operator = %condition.operator,
                    "condition evaluation failed: {}",
                    e
                );
                ConditionTrace::for_condition(condition, actual, false).with_error(e.to_string())
            }
        }
    }

    /// Evaluate a condition tree
    pub fn evaluate_node(node: &ConditionNode, context: &Context) -> (bool, NodeTrace) {
        match node {
            ConditionNode::Condition(condition) => {
                let trace = Self::evaluate(condition, context);
                (trace.result, NodeTrace::Condition(trace))
            }
            ConditionNode::Combinator { kind, children } => {
                let traces: Vec<NodeTrace> = children
                    .iter()
                    .map(|child| Self::evaluate_node(child, context).1)
                    .collect();
                let result = match kind {
                    CombinatorKind::All => traces.iter().all(NodeTrace::result),
                    CombinatorKind::Any => traces.iter().any(NodeTrace::result),
                    CombinatorKind::Not => traces.first().is_some_and(|child| !child.result()),
                };
                (
                    result,
                    NodeTrace::Combinator(CombinatorTrace::new(*kind, traces, result)),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_core::ast::Operator;
    use verdict_core::Value;

    fn context() -> Context {
        [
            ("risk_score", Value::from(0.5)),
            ("account_age", Value::from(200)),
            ("status", Value::from("closed")),
            ("tags", Value::from(vec!["premium"])),
            ("notes", Value::from("")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_leaf_trace() {
        let trace = ConditionEvaluator::evaluate(&Condition::new("risk_score", Operator::Lt, 0.7), &context());
        assert!(trace.result);
        assert_eq!(trace.description, "risk_score < 0.7");
        assert_eq!(trace.actual_value, Value::from(0.5));
        assert_eq!(trace.expected_value, Value::from(0.7));
        assert_eq!(trace.error, None);
    }

    #[test]
    fn test_in_operator_description() {
        let condition = Condition::new("status", Operator::In, vec!["active", "pending"]);
        let trace = ConditionEvaluator::evaluate(&condition, &context());
        assert!(!trace.result);
        assert_eq!(trace.description, "status in [\"active\",\"pending\"]");
    }

    #[test]
    fn test_type_mismatch_is_traced() {
        let condition = Condition::new("tags", Operator::Gt, 3);
        let trace = ConditionEvaluator::evaluate(&condition, &context());
        assert!(!trace.result);
        assert!(trace.error.as_deref().unwrap_or_default().contains("Type mismatch"));
        assert_eq!(trace.description, "tags > 3");
    }

    #[test]
    fn test_missing_fields_never_fail() {
        for op in Operator::ALL {
            let expected = if op == Operator::In {
                Value::from(vec![1])
            } else {
                Value::from(1)
            };
            let trace = ConditionEvaluator::evaluate(&Condition::new("absent", op, expected), &context());
            assert_eq!(trace.error, None, "operator {}", op);
            assert_eq!(trace.result, matches!(op, Operator::Neq | Operator::Blank));
        }
    }

    #[test]
    fn test_present_blank_complement() {
        for field in ["status", "notes", "tags", "absent"] {
            let present = ConditionEvaluator::evaluate(&Condition::present(field), &context());
            let blank = ConditionEvaluator::evaluate(&Condition::blank(field), &context());
            assert_ne!(present.result, blank.result, "field {}", field);
        }
    }

    #[test]
    fn test_all_without_short_circuit() {
        let node = ConditionNode::all(vec![
            Condition::new("risk_score", Operator::Lt, 0.7).into(),
            Condition::new("account_age", Operator::Gt, 365).into(),
            Condition::new("status", Operator::Eq, "closed").into(),
        ]);
        let (result, trace) = ConditionEvaluator::evaluate_node(&node, &context());

        assert!(!result);
        match &trace {
            NodeTrace::Combinator(combinator) => {
                assert_eq!(combinator.children.len(), 3);
                assert!(!combinator.children[1].result());
                assert!(combinator.children[2].result());
            }
            other => panic!("unexpected trace: {:?}", other),
        }
    }

    #[test]
    fn test_any_and_not() {
        let any = ConditionNode::any(vec![
            Condition::new("risk_score", Operator::Gt, 0.9).into(),
            Condition::new("tags", Operator::Contains, "premium").into(),
        ]);
        let (result, trace) = ConditionEvaluator::evaluate_node(&any, &context());
        assert!(result);
        assert_eq!(trace.leaves().len(), 2);

        let not = ConditionNode::not(any);
        let (result, trace) = ConditionEvaluator::evaluate_node(&not, &context());
        assert!(!result);
        assert_eq!(trace.leaves().len(), 2);
    }
}
