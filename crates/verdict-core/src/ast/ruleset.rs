//! Ruleset AST definitions
//!
//! A RuleSet is validated once at construction and is read-only afterwards,
//! so it can be shared across concurrent evaluations behind an `Arc`.

use super::rule::Rule;
use crate::error::StructuralError;
use serde::Serialize;
use std::collections::HashSet;

/// An ordered, validated collection of rules
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSet {
    id: String,
    version: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Validate and build a rule set
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        rules: Vec<Rule>,
    ) -> Result<Self, StructuralError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(StructuralError::MissingField {
                field: "ruleset".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            rule.validate()?;
            if !seen.insert(rule.id.as_str()) {
                return Err(StructuralError::DuplicateId {
                    id: rule.id.clone(),
                    scope: format!("ruleset '{}'", id),
                });
            }
        }

        log::debug!("validated ruleset '{}' with {} rules", id, rules.len());

        Ok(Self {
            id,
            version: version.into(),
            rules,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Look up a rule by ID
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
