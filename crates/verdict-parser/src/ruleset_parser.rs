//! Ruleset parser
//!
//! Parses rule set documents (YAML or JSON) into validated `RuleSet`s:
//!
//! ```yaml
//! version: "1.0"
//! ruleset: loan_policy
//! rules:
//!   - id: low_risk
//!     when:
//!       all:
//!         - { field: risk_score, op: lt, value: 0.7 }
//!         - { field: account_age, op: gt, value: 180 }
//!     then: { decision: approved, weight: 0.9, reason: "Low risk" }
//! ```

use crate::condition_parser::ConditionParser;
use crate::error::{ParseError, Result};
use crate::yaml_parser::YamlParser;
use serde_yaml::Value as YamlValue;
use verdict_core::ast::{Rule, RuleSet};

const DEFAULT_VERSION: &str = "1.0";

/// Ruleset parser
pub struct RulesetParser;

impl RulesetParser {
    /// Parse a ruleset from YAML or JSON text
    pub fn parse(content: &str) -> Result<RuleSet> {
        let yaml = YamlParser::parse(content)?;
        Self::parse_from_yaml(&yaml)
    }

    /// Parse a ruleset from a YAML value.
    ///
    /// The rule set may sit at the top level (`ruleset: <id>`) or be nested
    /// under a `ruleset` mapping.
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<RuleSet> {
        let (body, id) = match yaml.get("ruleset") {
            Some(nested @ YamlValue::Mapping(_)) => (nested, YamlParser::get_string(nested, "id")?),
            Some(YamlValue::String(id)) => (yaml, id.clone()),
            _ => (yaml, YamlParser::get_string(yaml, "id").map_err(|_| ParseError::missing_field("ruleset"))?),
        };

        let version = YamlParser::get_optional_scalar(body, "version")
            .or_else(|| YamlParser::get_optional_scalar(yaml, "version"))
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());

        let rules = YamlParser::get_array(body, "rules")?
            .iter()
            .map(Self::parse_rule)
            .collect::<Result<Vec<_>>>()?;

        log::debug!("parsed ruleset '{}' v{} ({} rules)", id, version, rules.len());

        Ok(RuleSet::new(id, version, rules)?)
    }

    /// Parse a single rule.
    ///
    /// The outcome is read from `then` when present, otherwise from the rule
    /// mapping itself (`decision`, `weight`, `reason`).
    pub fn parse_rule(yaml: &YamlValue) -> Result<Rule> {
        let id = YamlParser::get_string(yaml, "id")?;

        let when = yaml
            .get("when")
            .ok_or_else(|| ParseError::missing_field(format!("{}.when", id)))?;
        let condition = ConditionParser::parse_from_yaml(when)?;

        let outcome = yaml.get("then").unwrap_or(yaml);
        let decision = YamlParser::get_optional_scalar(outcome, "decision")
            .ok_or_else(|| ParseError::missing_field(format!("{}.then.decision", id)))?;
        let weight = YamlParser::get_optional_f64(outcome, "weight")?.unwrap_or(1.0);
        let reason = YamlParser::get_optional_string(outcome, "reason").unwrap_or_default();

        Ok(Rule::new(id, condition, decision)
            .with_weight(weight)
            .with_reason(reason))
    }
}
