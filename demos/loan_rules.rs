//! Loan policy example
//!
//! This example demonstrates:
//! - Building a DecisionAgent from two rule sets
//! - Deciding against nested JSON facts
//! - Reading the explanation in terse and verbose form

use anyhow::Result;
use serde_json::json;
use verdict_sdk::{DecisionAgentBuilder, Verbosity};

const LOAN_POLICY: &str = r#"
version: "1.0"
ruleset: loan_policy
rules:
  - id: low_risk
    when:
      all:
        - { field: applicant.risk_score, op: lt, value: 0.7 }
        - { field: applicant.account_age, op: gt, value: 180 }
    then: { decision: approved, weight: 0.9, reason: "Low risk, established account" }
  - id: high_risk
    when:
      any:
        - { field: applicant.risk_score, op: gte, value: 0.7 }
        - { field: applicant.flags, op: contains, value: fraud }
    then: { decision: denied, weight: 1.0, reason: "High risk" }
"#;

const INCOME_CHECK: &str = r#"
ruleset: income_check
rules:
  - id: stable_income
    when: "applicant.income >= 40000"
    decision: approved
    weight: 0.7
    reason: Income covers the requested amount
  - id: missing_income
    when: applicant.income is blank
    decision: review
    weight: 0.5
    reason: Income was not declared
"#;

fn main() -> Result<()> {
    init_tracing()?;

    println!("=== Loan Rules Example ===\n");

    let agent = DecisionAgentBuilder::new()
        .with_name("loans")
        .add_definition_content(LOAN_POLICY)
        .add_definition_content(INCOME_CHECK)
        .build()?;

    let applicants = [
        json!({ "applicant": { "risk_score": 0.35, "account_age": 400, "income": 52000, "flags": [] } }),
        json!({ "applicant": { "risk_score": 0.82, "account_age": 90, "flags": ["fraud"] } }),
        json!({ "applicant": { "risk_score": 0.5, "account_age": 30 } }),
    ];

    for (i, facts) in applicants.iter().enumerate() {
        let decision = agent.decide_json(facts)?;

        println!("Applicant #{}:", i + 1);
        println!("  Decision: {}", decision.decision());
        println!("  Confidence: {:.2}", decision.confidence());
        println!("  Explanations: {:?}", decision.explanations());
        println!("  Because: {:?}", decision.because());
        println!("  Failed: {:?}\n", decision.failed_conditions());
    }

    let decision = agent.decide_json(&applicants[1])?;
    let report = decision.report(Verbosity::Verbose);
    println!("Verbose report for applicant #2:");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verdict_sdk=info,verdict_runtime=warn".into()),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}
