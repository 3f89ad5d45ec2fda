//! Rule AST definitions

use super::condition::ConditionNode;
use crate::error::StructuralError;
use serde::{Deserialize, Serialize};

/// Rule definition: a condition tree plus the outcome it backs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule ID
    pub id: String,

    /// Condition tree; the rule matches iff it evaluates to true
    pub condition: ConditionNode,

    /// Decision label produced when the rule matches
    pub decision: String,

    /// Contribution weight in [0, 1]
    pub weight: f64,

    /// Human-readable reason reported with the decision
    #[serde(default)]
    pub reason: String,
}

impl Rule {
    /// Create a new rule with weight 1.0 and no reason
    pub fn new(id: impl Into<String>, condition: ConditionNode, decision: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            condition,
            decision: decision.into(),
            weight: 1.0,
            reason: String::new(),
        }
    }

    /// Set the weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<(), StructuralError> {
        if self.id.trim().is_empty() {
            return Err(StructuralError::MissingField {
                field: "id".to_string(),
            });
        }
        if self.decision.trim().is_empty() {
            return Err(StructuralError::MissingField {
                field: format!("{}.decision", self.id),
            });
        }
        if !(0.0..=1.0).contains(&self.weight) {
            return Err(StructuralError::InvalidWeight {
                id: self.id.clone(),
                weight: self.weight,
            });
        }
        self.condition.validate()
    }
}
