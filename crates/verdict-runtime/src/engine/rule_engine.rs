//! Rule engine
//!
//! Evaluates every rule of a rule set in declared order. A rule matches iff
//! its condition tree is true; matching rules contribute their outcome.

use super::condition::ConditionEvaluator;
use crate::context::Context;
use crate::result::{EvaluationResult, RuleTrace};
use verdict_core::ast::RuleSet;

/// Rule set evaluator
pub struct RuleEngine;

impl RuleEngine {
    pub fn evaluate(ruleset: &RuleSet, context: &Context) -> EvaluationResult {
        let mut traces = Vec::with_capacity(ruleset.len());
        let mut matched = Vec::new();

        for (index, rule) in ruleset.rules().iter().enumerate() {
            let (result, condition_trace) = ConditionEvaluator::evaluate_node(&rule.condition, context);
            tracing::debug!(
                ruleset = ruleset.id(),
                rule_id = %rule.id,
                matched = result,
                "evaluated rule"
            );
            if result {
                matched.push(index);
            }
            traces.push(
                RuleTrace::new(rule.id.clone(), condition_trace).with_outcome(
                    rule.decision.clone(),
                    rule.weight,
                    rule.reason.clone(),
                ),
            );
        }

        EvaluationResult::assemble(ruleset.id(), traces, &matched)
    }
}
