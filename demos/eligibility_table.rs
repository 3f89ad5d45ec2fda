//! DMN decision table example
//!
//! This example demonstrates:
//! - Parsing a decision table with FEEL unary tests
//! - Inspecting per-row traces straight from the table engine
//! - Scoring the same table through an agent, including a hit policy violation

use anyhow::Result;
use serde_json::json;
use verdict_parser::DecisionTableParser;
use verdict_runtime::{Context, DecisionTableEngine};
use verdict_sdk::{AgentConfig, DecisionAgentBuilder, ScoringConfig, ViolationPolicy};

const ELIGIBILITY: &str = r#"
decision: eligibility
hit_policy: unique
inputs:
  - { expression: customer.age, label: Age }
  - { expression: customer.tier }
  - { expression: "string length(customer.country)", label: Country code length }
outputs: [decision, discount]
rules:
  - id: minor
    inputs: ["< 18", "-", "-"]
    outputs: ['"denied"', "0"]
    description: Minors are not eligible
  - id: gold_adult
    inputs: ["[18..120]", '"gold", "platinum"', "2"]
    outputs: ['"approved"', "0.15"]
    weight: 0.9
  - id: adult
    inputs: [">= 18", "-", "2"]
    outputs: ['"review"', "0"]
    weight: 0.6
"#;

fn main() -> Result<()> {
    init_tracing()?;

    println!("=== Eligibility Table Example ===\n");

    let table = DecisionTableParser::parse(ELIGIBILITY)?;

    let context = Context::from_json(&json!({
        "customer": { "age": 34, "tier": "silver", "country": "DE" }
    }))?;
    let result = DecisionTableEngine::evaluate(&table, &context);

    println!("Row traces:");
    for trace in &result.rule_traces {
        println!("  {} matched={}", trace.rule_id, trace.matched);
        for leaf in trace.condition_trace.leaves() {
            println!(
                "    {:<32} actual={} -> {}",
                leaf.description,
                leaf.actual_value.render(),
                leaf.result
            );
        }
    }
    println!();

    let config = AgentConfig::new()
        .with_name("eligibility")
        .with_scoring(ScoringConfig::default().with_violation(ViolationPolicy::NoDecision));
    let agent = DecisionAgentBuilder::new()
        .with_config(config)
        .with_table(table)
        .build()?;

    for customer in [
        json!({ "customer": { "age": 34, "tier": "silver", "country": "DE" } }),
        json!({ "customer": { "age": 16, "tier": "gold", "country": "FR" } }),
        json!({ "customer": { "age": 45, "tier": "gold", "country": "US" } }),
    ] {
        let decision = agent.decide_json(&customer)?;
        println!("{}", customer);
        println!(
            "  -> {} ({:.2}) {:?}",
            decision.decision(),
            decision.confidence(),
            decision.explanations()
        );
    }

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
