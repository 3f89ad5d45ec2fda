//! DMN decision table engine
//!
//! Rows are evaluated in table order against input values computed once per
//! call. Each non-wildcard cell yields a condition trace and each row yields
//! a rule trace shaped like a rule set's, so downstream scoring and
//! explanations do not care which kind of evaluator ran.

use crate::context::Context;
use crate::error::Result;
use crate::expression::ExpressionEvaluator;
use crate::result::{
    CombinatorTrace, ConditionTrace, EvaluationResult, HitPolicyViolation, NodeTrace, RuleTrace,
};
use verdict_core::ast::{
    BinaryOperator, CombinatorKind, DecisionTable, Expression, HitPolicy, InputClause, Operator,
    TableRow,
};
use verdict_core::Value;

/// Decision table evaluator
pub struct DecisionTableEngine;

impl DecisionTableEngine {
    pub fn evaluate(table: &DecisionTable, context: &Context) -> EvaluationResult {
        let inputs: Vec<Option<Result<Value>>> = table
            .inputs()
            .iter()
            .map(|clause| {
                clause
                    .expression
                    .as_ref()
                    .map(|expression| ExpressionEvaluator::evaluate(expression, context))
            })
            .collect();

        let traces: Vec<RuleTrace> = table
            .rows()
            .iter()
            .map(|row| Self::evaluate_row(table, row, &inputs, context))
            .collect();

        let matched: Vec<usize> = traces
            .iter()
            .enumerate()
            .filter(|(_, trace)| trace.matched)
            .map(|(index, _)| index)
            .collect();

        tracing::debug!(
            table = table.id(),
            hit_policy = %table.hit_policy(),
            matched = matched.len(),
            "evaluated decision table"
        );

        match Self::select(table, &traces, &matched) {
            Ok(selected) => {
                let output = match table.hit_policy() {
                    HitPolicy::Collect => Some(Value::List(
                        selected
                            .iter()
                            .filter_map(|&i| traces[i].output.clone())
                            .collect(),
                    )),
                    _ => selected.first().and_then(|&i| traces[i].output.clone()),
                };
                let result = EvaluationResult::assemble(table.id(), traces, &selected);
                match output {
                    Some(output) => result.with_output(output),
                    None => result,
                }
            }
            Err(violation) => {
                tracing::warn!("{}", violation);
                EvaluationResult::assemble(table.id(), traces, &[]).with_violation(violation)
            }
        }
    }

    /// Apply the hit policy to the matching rows
    fn select(
        table: &DecisionTable,
        traces: &[RuleTrace],
        matched: &[usize],
    ) -> std::result::Result<Vec<usize>, HitPolicyViolation> {
        let violation = |message: String| HitPolicyViolation {
            hit_policy: table.hit_policy(),
            table: table.id().to_string(),
            matched_rows: matched.iter().map(|&i| traces[i].rule_id.clone()).collect(),
            message,
        };

        match table.hit_policy() {
            HitPolicy::Unique if matched.len() > 1 => {
                let ids: Vec<&str> = matched.iter().map(|&i| traces[i].rule_id.as_str()).collect();
                Err(violation(format!(
                    "{} rows matched: {}",
                    matched.len(),
                    ids.join(", ")
                )))
            }
            HitPolicy::Unique | HitPolicy::First => Ok(matched.iter().take(1).copied().collect()),
            HitPolicy::Any => {
                let first = matched.first().map(|&i| &traces[i].output);
                if matched.iter().all(|&i| Some(&traces[i].output) == first) {
                    Ok(matched.iter().take(1).copied().collect())
                } else {
                    Err(violation("matching rows disagree on the output".to_string()))
                }
            }
            HitPolicy::Priority => {
                let mut best: Option<usize> = None;
                for &index in matched {
                    let priority = traces[index].priority.unwrap_or(0);
                    if best.map_or(true, |b| priority > traces[b].priority.unwrap_or(0)) {
                        best = Some(index);
                    }
                }
                Ok(best.into_iter().collect())
            }
            HitPolicy::Collect => Ok(matched.to_vec()),
        }
    }

    fn evaluate_row(
        table: &DecisionTable,
        row: &TableRow,
        inputs: &[Option<Result<Value>>],
        context: &Context,
    ) -> RuleTrace {
        let cells: Vec<NodeTrace> = row
            .input_entries
            .iter()
            .zip(table.inputs())
            .zip(inputs)
            .filter_map(|((entry, clause), input)| {
                entry.as_ref().map(|cell| {
                    NodeTrace::from(Self::evaluate_cell(cell, clause, input.as_ref(), context))
                })
            })
            .collect();
        let matched = cells.iter().all(NodeTrace::result);
        let condition_trace =
            NodeTrace::from(CombinatorTrace::new(CombinatorKind::All, cells, matched));

        let outputs = row
            .output_entries
            .iter()
            .map(|entry| ExpressionEvaluator::evaluate(entry, context))
            .collect::<Result<Vec<_>>>();

        let trace = RuleTrace::new(row.id.clone(), condition_trace).with_priority(row.priority);
        match outputs {
            Ok(mut values) => {
                let labels: Vec<String> = values.iter().map(Value::to_label).collect();
                let decision = labels.first().cloned().unwrap_or_default();
                let reason = row.description.clone().unwrap_or_else(|| labels.join(", "));
                let output = if values.len() == 1 {
                    values.remove(0)
                } else {
                    Value::List(values)
                };
                trace
                    .with_outcome(decision, row.weight, reason)
                    .with_output(output)
            }
            Err(e) => {
                let decision = row
                    .output_entries
                    .first()
                    .map(Expression::to_string)
                    .unwrap_or_default();
                trace
                    .with_outcome(decision, row.weight, row.description.clone().unwrap_or_default())
                    .with_error(format!("output evaluation failed: {}", e))
            }
        }
    }

    fn evaluate_cell(
        cell: &Expression,
        clause: &InputClause,
        input: Option<&Result<Value>>,
        context: &Context,
    ) -> ConditionTrace {
        let (operator, expected, description) = Self::describe_cell(cell, &clause.label);

        match input {
            // Unary test against the column input
            Some(Ok(value)) => {
                let trace = ConditionTrace::new(
                    clause.label.clone(),
                    operator,
                    expected,
                    value.clone(),
                    false,
                    description,
                );
                match ExpressionEvaluator::evaluate_test(cell, context, Some(value)) {
                    Ok(result) => ConditionTrace { result, ..trace },
                    Err(e) => trace.with_error(e.to_string()),
                }
            }
            Some(Err(e)) => ConditionTrace::new(
                clause.label.clone(),
                operator,
                expected,
                Value::Missing,
                false,
                description,
            )
            .with_error(format!("input evaluation failed: {}", e)),
            // Boolean column: the cell is a complete expression
            None => match ExpressionEvaluator::evaluate(cell, context) {
                Ok(actual) => {
                    let result = actual.as_bool().unwrap_or(false);
                    let trace = ConditionTrace::new(
                        clause.label.clone(),
                        None,
                        Value::Bool(true),
                        actual.clone(),
                        result,
                        description,
                    );
                    match actual {
                        Value::Bool(_) | Value::Missing => trace,
                        other => trace.with_error(format!(
                            "'{}' evaluated to {} instead of a boolean",
                            cell,
                            other.kind_name()
                        )),
                    }
                }
                Err(e) => ConditionTrace::new(
                    clause.label.clone(),
                    None,
                    Value::Bool(true),
                    Value::Missing,
                    false,
                    description,
                )
                .with_error(e.to_string()),
            },
        }
    }

    /// Comparison-shaped cells (`? < 18`, `? in ["a","b"]`) render like
    /// condition leaves; anything else renders as FEEL text with `?`
    /// replaced by the column label.
    fn describe_cell(cell: &Expression, label: &str) -> (Option<Operator>, Value, String) {
        if let Expression::Binary { left, op, right } = cell {
            if **left == Expression::Input {
                if let (Some(operator), Some(expected)) =
                    (op.as_condition_operator(), Self::literal(right))
                {
                    // `in` only maps onto the condition operator for lists
                    if operator != Operator::In || matches!(expected, Value::List(_)) {
                        let description = operator.describe(label, &expected);
                        return (Some(operator), expected, description);
                    }
                }
            }
        }
        (None, Value::Missing, cell.render_with_subject(label))
    }

    fn literal(expression: &Expression) -> Option<Value> {
        match expression {
            Expression::Literal(value) => Some(value.clone()),
            Expression::List(items) => items
                .iter()
                .map(Self::literal)
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_parser::DecisionTableParser;

    fn table(hit_policy: &str) -> DecisionTable {
        let yaml = format!(
            r#"
decision: eligibility
hit_policy: {}
inputs: [ customer.age, customer.tier ]
outputs: [ decision ]
rules:
  - id: adult
    inputs: [ ">= 18", "-" ]
    outputs: [ '"approved"' ]
    weight: 0.8
    priority: 1
  - id: gold
    inputs: [ "-", '"gold", "platinum"' ]
    outputs: [ '"approved"' ]
    priority: 5
    description: Gold customers
  - id: senior
    inputs: [ "[65..120]", "-" ]
    outputs: [ '"review"' ]
    priority: 5
"#,
            hit_policy
        );
        DecisionTableParser::parse(&yaml).unwrap()
    }

    fn context(age: i32, tier: &str) -> Context {
        [("customer.age", Value::from(age)), ("customer.tier", Value::from(tier))]
            .into_iter()
            .collect()
    }

    fn matched_ids(result: &EvaluationResult) -> Vec<&str> {
        result.matched_rules.iter().map(|o| o.rule_id.as_str()).collect()
    }

    #[test]
    fn test_cell_traces() {
        let result = DecisionTableEngine::evaluate(&table("first"), &context(30, "gold"));

        let adult = &result.rule_traces[0];
        assert!(adult.matched);
        let leaves = adult.condition_trace.leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].description, "customer.age >= 18");
        assert_eq!(leaves[0].operator, Some(Operator::Gte));
        assert_eq!(leaves[0].actual_value, Value::from(30));

        let gold = result.rule_traces[1].condition_trace.leaves();
        assert_eq!(gold[0].description, "customer.tier in [\"gold\",\"platinum\"]");

        let senior = result.rule_traces[2].condition_trace.leaves();
        assert_eq!(senior[0].description, "customer.age in [65..120]");
        assert_eq!(senior[0].operator, None);
        assert!(!senior[0].result);
    }

    #[test]
    fn test_unique_violation() {
        let result = DecisionTableEngine::evaluate(&table("unique"), &context(30, "gold"));

        let violation = result.violation.as_ref().unwrap();
        assert_eq!(violation.hit_policy, HitPolicy::Unique);
        assert_eq!(violation.matched_rows, vec!["adult", "gold"]);
        assert!(result.matched_rules.is_empty());
        assert!(result.because.is_empty());
    }

    #[test]
    fn test_unique_single_match() {
        let result = DecisionTableEngine::evaluate(&table("unique"), &context(30, "basic"));
        assert!(result.violation.is_none());
        assert_eq!(matched_ids(&result), vec!["adult"]);
        assert_eq!(result.output, Some(Value::from("approved")));
        assert_eq!(result.because, vec!["customer.age >= 18"]);
    }

    #[test]
    fn test_first_and_priority() {
        let ctx = context(70, "gold");

        let first = DecisionTableEngine::evaluate(&table("first"), &ctx);
        assert_eq!(matched_ids(&first), vec!["adult"]);

        // gold and senior tie on priority 5; table order wins
        let priority = DecisionTableEngine::evaluate(&table("priority"), &ctx);
        assert_eq!(matched_ids(&priority), vec!["gold"]);
        assert_eq!(priority.matched_rules[0].reason, "Gold customers");
    }

    #[test]
    fn test_any_requires_agreement() {
        let agree = DecisionTableEngine::evaluate(&table("any"), &context(30, "gold"));
        assert!(agree.violation.is_none());
        assert_eq!(matched_ids(&agree), vec!["adult"]);

        let disagree = DecisionTableEngine::evaluate(&table("any"), &context(70, "basic"));
        assert!(disagree.violation.is_some());
        assert!(disagree.matched_rules.is_empty());
    }

    #[test]
    fn test_collect() {
        let result = DecisionTableEngine::evaluate(&table("collect"), &context(70, "gold"));
        assert_eq!(matched_ids(&result), vec!["adult", "gold", "senior"]);
        assert_eq!(
            result.output,
            Some(Value::from(vec!["approved", "approved", "review"]))
        );
    }

    #[test]
    fn test_unbound_input_fails_cells() {
        let ctx: Context = [("customer.tier", Value::from("gold"))].into_iter().collect();
        let result = DecisionTableEngine::evaluate(&table("first"), &ctx);

        let adult = result.rule_traces[0].condition_trace.leaves();
        assert!(!adult[0].result);
        assert!(adult[0].error.as_deref().unwrap_or_default().contains("customer.age"));
        assert_eq!(matched_ids(&result), vec!["gold"]);
    }

    #[test]
    fn test_boolean_columns() {
        let yaml = r#"
decision: flags
hit_policy: collect
outputs: [ flag ]
rules:
  - id: big_foreign
    inputs: [ "amount > 1000 and country != \"US\"" ]
    outputs: [ '"review"' ]
  - id: always
    inputs: [ "-" ]
    outputs: [ '"logged"' ]
"#;
        let table = DecisionTableParser::parse(yaml).unwrap();
        let ctx: Context = [("amount", Value::from(5000)), ("country", Value::from("NO"))]
            .into_iter()
            .collect();
        let result = DecisionTableEngine::evaluate(&table, &ctx);

        assert_eq!(matched_ids(&result), vec!["big_foreign", "always"]);
        assert_eq!(
            result.because,
            vec!["amount > 1000 and country != \"US\""]
        );
    }
}
