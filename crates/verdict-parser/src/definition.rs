//! Definition documents of either kind

use crate::decision_table_parser::DecisionTableParser;
use crate::error::Result;
use crate::ruleset_parser::RulesetParser;
use crate::yaml_parser::YamlParser;
use serde_yaml::Value as YamlValue;
use verdict_core::ast::{DecisionTable, RuleSet};

/// A parsed rule set or decision table
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    RuleSet(RuleSet),
    DecisionTable(DecisionTable),
}

impl Definition {
    pub fn id(&self) -> &str {
        match self {
            Definition::RuleSet(ruleset) => ruleset.id(),
            Definition::DecisionTable(table) => table.id(),
        }
    }
}

/// Parses a document without knowing its kind up front
pub struct DefinitionParser;

impl DefinitionParser {
    /// Documents with a `decision` or `hit_policy` key are decision tables,
    /// anything else is a rule set
    pub fn parse(content: &str) -> Result<Definition> {
        let yaml = YamlParser::parse(content)?;
        Self::parse_from_yaml(&yaml)
    }

    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<Definition> {
        if Self::is_decision_table(yaml) {
            DecisionTableParser::parse_from_yaml(yaml).map(Definition::DecisionTable)
        } else {
            RulesetParser::parse_from_yaml(yaml).map(Definition::RuleSet)
        }
    }

    fn is_decision_table(yaml: &YamlValue) -> bool {
        YamlParser::has_field(yaml, "hit_policy")
            || yaml.get("decision").is_some_and(YamlValue::is_string)
    }
}
