//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;
use verdict_sdk::{AgentConfig, Context, DecisionAgent, DecisionAgentBuilder};

/// Test helper that writes definitions to a temporary directory and builds
/// an agent loading them from disk
pub struct TestAgent {
    dir: TempDir,
    config: AgentConfig,
    files: Vec<PathBuf>,
}

impl TestAgent {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            config: AgentConfig::new(),
            files: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Write a rule set or decision table document
    pub fn with_definition(mut self, yaml: &str) -> Self {
        let path = self.dir.path().join(format!("definition_{}.yaml", self.files.len()));
        std::fs::write(&path, yaml.trim()).expect("write definition");
        self.files.push(path);
        self
    }

    /// Write a file into the temp directory and return its path
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("write file");
        path
    }

    pub fn build(&self) -> DecisionAgent {
        self.files
            .iter()
            .fold(
                DecisionAgentBuilder::new().with_config(self.config.clone()),
                |builder, path| builder.add_definition_file(path.clone()),
            )
            .build()
            .expect("build agent")
    }
}

/// Context from a JSON object
pub fn context(json: serde_json::Value) -> Context {
    Context::from_json(&json).expect("valid context")
}

/// Rule set with a single rule `score > threshold` deciding `decision`
pub fn threshold_ruleset(id: &str, threshold: i64, decision: &str, weight: f64) -> String {
    format!(
        r#"
ruleset: {id}
rules:
  - id: {id}_rule
    when: "score > {threshold}"
    then:
      decision: {decision}
      weight: {weight}
      reason: "{id} says {decision}"
"#
    )
}

pub const LOAN_POLICY: &str = r#"
version: "1.0"
ruleset: loan_policy
rules:
  - id: low_risk
    when:
      all:
        - { field: risk_score, op: lt, value: 0.7 }
        - { field: account_age, op: gt, value: 180 }
    then: { decision: approved, weight: 0.9, reason: "Low risk" }
  - id: high_risk
    when:
      any:
        - { field: risk_score, op: gte, value: 0.7 }
        - { field: flags, op: contains, value: fraud }
    then: { decision: denied, weight: 1.0, reason: "High risk" }
"#;

pub const ELIGIBILITY_TABLE: &str = r#"
decision: eligibility
hit_policy: unique
inputs:
  - { expression: customer.age }
  - { expression: customer.tier }
outputs: [decision]
rules:
  - id: minor
    inputs: ["< 18", "-"]
    outputs: ['"denied"']
    description: Minors are not eligible
  - id: gold_adult
    inputs: [">= 18", '"gold"']
    outputs: ['"approved"']
    weight: 0.9
  - id: adult
    inputs: [">= 18", "-"]
    outputs: ['"review"']
    weight: 0.6
"#;
