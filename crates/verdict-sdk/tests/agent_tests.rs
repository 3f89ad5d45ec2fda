//! Decision agent integration tests
//!
//! Definitions are loaded from disk through the builder and decided end to
//! end, covering scoring policies, explanations and concurrent use.

mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use verdict_sdk::*;

#[test]
fn test_loan_policy_approves_low_risk() {
    let agent = TestAgent::new().with_definition(LOAN_POLICY).build();
    let decision = agent
        .decide(&context(json!({ "risk_score": 0.5, "account_age": 200, "flags": [] })))
        .unwrap();

    assert_eq!(decision.decision(), "approved");
    assert!((decision.confidence() - 0.9).abs() < 1e-9);
    assert_eq!(decision.explanations(), ["Low risk"]);
    assert_eq!(decision.because(), ["risk_score < 0.7", "account_age > 180"]);
    assert_eq!(
        decision.failed_conditions(),
        ["risk_score >= 0.7", "flags contains \"fraud\""]
    );
}

#[test]
fn test_no_match_lists_every_failure() {
    let agent = TestAgent::new().with_definition(LOAN_POLICY).build();
    let decision = agent
        .decide(&context(json!({ "risk_score": 0.5, "account_age": 30, "flags": [] })))
        .unwrap();

    assert_eq!(decision.decision(), "no_decision");
    assert_eq!(decision.confidence(), 0.0);
    assert!(!decision.is_decided());
    assert!(decision.because().is_empty());
    assert_eq!(
        decision.failed_conditions(),
        ["account_age > 180", "risk_score >= 0.7", "flags contains \"fraud\""]
    );
}

#[test]
fn test_rule_deciding_the_fallback_label_is_still_explained() {
    let agent = TestAgent::new()
        .with_definition(&threshold_ruleset("abstain", 10, "no_decision", 0.4))
        .build();
    let decision = agent.decide(&context(json!({ "score": 50 }))).unwrap();

    assert_eq!(decision.decision(), "no_decision");
    assert!(decision.is_decided());
    assert!((decision.confidence() - 0.4).abs() < 1e-9);
    assert_eq!(decision.because(), ["score > 10"]);

    let fallback = agent.decide(&context(json!({ "score": 5 }))).unwrap();
    assert!(!fallback.is_decided());
    assert!(fallback.because().is_empty());
    assert_eq!(fallback.failed_conditions(), ["score > 10"]);
}

#[test]
fn test_unique_violation_falls_back_to_no_decision() {
    let agent = TestAgent::new().with_definition(ELIGIBILITY_TABLE).build();
    let decision = agent
        .decide(&context(json!({ "customer": { "age": 30, "tier": "gold" } })))
        .unwrap();

    assert_eq!(decision.decision(), "no_decision");
    assert_eq!(decision.confidence(), 0.0);
    let violation = decision.evaluations()[0].violation.as_ref().unwrap();
    assert_eq!(violation.matched_rows, vec!["gold_adult", "adult"]);
    assert!(decision.explanations()[0].contains("violated in 'eligibility'"));
}

#[test]
fn test_unique_violation_fail_policy() {
    let config = AgentConfig::new()
        .with_scoring(ScoringConfig::default().with_violation(ViolationPolicy::Fail));
    let agent = TestAgent::new()
        .with_config(config)
        .with_definition(ELIGIBILITY_TABLE)
        .build();

    let error = agent
        .decide(&context(json!({ "customer": { "age": 30, "tier": "gold" } })))
        .unwrap_err();
    assert!(matches!(error, SdkError::HitPolicyViolation(_)));
}

#[test]
fn test_table_single_match() {
    let agent = TestAgent::new().with_definition(ELIGIBILITY_TABLE).build();
    let decision = agent
        .decide(&context(json!({ "customer": { "age": 16, "tier": "gold" } })))
        .unwrap();

    assert_eq!(decision.decision(), "denied");
    assert_eq!(decision.confidence(), 1.0);
    assert_eq!(decision.explanations(), ["Minors are not eligible"]);
    assert_eq!(decision.because(), ["customer.age < 18"]);
}

fn example_five(config: AgentConfig) -> DecisionAgent {
    TestAgent::new()
        .with_config(config)
        .with_definition(&threshold_ruleset("first", 10, "approved", 0.9))
        .with_definition(&threshold_ruleset("second", 20, "approved", 0.7))
        .with_definition(&threshold_ruleset("third", 30, "denied", 0.95))
        .build()
}

#[test]
fn test_example_five_contributors() {
    let agent = example_five(AgentConfig::new());
    let decision = agent.decide(&context(json!({ "score": 50 }))).unwrap();

    assert_eq!(decision.decision(), "denied");
    assert!((decision.confidence() - 0.95).abs() < 1e-9);
    assert_eq!(decision.because(), ["score > 30"]);
    assert_eq!(decision.explanations(), ["third says denied"]);
}

#[test]
fn test_example_five_total_evaluators() {
    let config = AgentConfig::new().with_scoring(
        ScoringConfig::default().with_denominator(DenominatorPolicy::TotalEvaluators),
    );
    let agent = example_five(config);
    let decision = agent.decide(&context(json!({ "score": 50 }))).unwrap();

    assert_eq!(decision.decision(), "approved");
    assert!((decision.confidence() - 1.6 / 3.0).abs() < 1e-9);
    assert_eq!(decision.because(), ["score > 10", "score > 20"]);
}

#[test]
fn test_unanimous_from_config() {
    let config = AgentConfig::new()
        .with_scoring(ScoringConfig::default().with_strategy(StrategyKind::Unanimous));
    let agent = example_five(config);

    let split = agent.decide(&context(json!({ "score": 50 }))).unwrap();
    assert_eq!(split.decision(), "no_decision");

    let partial = agent.decide(&context(json!({ "score": 25 }))).unwrap();
    assert_eq!(partial.decision(), "no_decision");
}

#[test]
fn test_highest_weight_from_config() {
    let config = AgentConfig::new()
        .with_scoring(ScoringConfig::default().with_strategy(StrategyKind::HighestWeight));
    let agent = example_five(config);

    let decision = agent.decide(&context(json!({ "score": 25 }))).unwrap();
    assert_eq!(decision.decision(), "approved");
    assert_eq!(decision.confidence(), 0.9);
}

#[test]
fn test_reports() {
    let agent = TestAgent::new().with_definition(LOAN_POLICY).build();
    let decision = agent
        .decide(&context(json!({ "risk_score": 0.9, "account_age": 400 })))
        .unwrap();
    assert_eq!(decision.decision(), "denied");

    let terse = decision.report(Verbosity::Terse);
    assert_eq!(terse.because, vec!["risk_score >= 0.7"]);
    assert!(terse.evaluators.is_none());

    let verbose = decision.report(Verbosity::Verbose);
    let evaluators = verbose.evaluators.unwrap();
    let high_risk = &evaluators[0].rules[1];
    assert!(high_risk.matched);
    assert_eq!(high_risk.conditions[0].actual_value, Value::Number(0.9));
    assert_eq!(high_risk.conditions[1].actual_value, Value::Missing);
    assert_eq!(high_risk.conditions[1].expected_value, Value::from("fraud"));
}

#[test]
fn test_agent_from_config_file() -> anyhow::Result<()> {
    let helper = TestAgent::new();
    helper.write("loan.yaml", LOAN_POLICY);
    helper.write("eligibility.yaml", ELIGIBILITY_TABLE);
    let config_path = helper.write(
        "agent.yaml",
        r#"
name: onboarding
scoring:
  violation: ignore
explain:
  verbosity: verbose
rule_files: [loan.yaml]
table_files: [eligibility.yaml]
"#,
    );

    let config = AgentConfig::from_file(&config_path)?;
    let agent = DecisionAgentBuilder::new().with_config(config).build()?;
    assert_eq!(agent.name(), "onboarding");
    assert_eq!(agent.evaluator_names(), vec!["loan_policy", "eligibility"]);

    let report = agent
        .explain(&context(json!({
            "risk_score": 0.2,
            "account_age": 365,
            "customer": { "age": 40, "tier": "gold" }
        })))?;

    // the table violates `unique` and is ignored, the rule set decides
    assert_eq!(report.decision, "approved");
    assert_eq!(report.evaluators.as_ref().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn test_decision_serializes_full_trace() {
    let agent = TestAgent::new().with_definition(ELIGIBILITY_TABLE).build();
    let decision = agent
        .decide(&context(json!({ "customer": { "age": 40, "tier": "silver" } })))
        .unwrap();

    let dump = serde_json::to_value(&decision).unwrap();
    assert_eq!(dump["decision"], "review");
    assert_eq!(dump["evaluations"][0]["matched_rules"][0]["rule_id"], "adult");
    assert_eq!(dump["explainability"]["decision"], "review");
}

#[tokio::test]
async fn test_shared_agent_across_tasks() {
    let agent = Arc::new(example_five(AgentConfig::new()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let agent = Arc::clone(&agent);
            tokio::task::spawn_blocking(move || {
                let score = if i % 2 == 0 { 50 } else { 15 };
                agent.decide(&context(json!({ "score": score }))).map(|d| {
                    (score, d.decision().to_string())
                })
            })
        })
        .collect();

    for handle in handles {
        let (score, decision) = handle.await.unwrap().unwrap();
        let expected = if score == 50 { "denied" } else { "approved" };
        assert_eq!(decision, expected);
    }
}
