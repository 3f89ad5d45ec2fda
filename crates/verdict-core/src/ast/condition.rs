//! Condition trees
//!
//! A condition tree is built from leaf conditions (`field`, `operator`,
//! `expected`) combined with `all`, `any` and `not`.

use super::operator::Operator;
use crate::error::StructuralError;
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field/operator/value test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Dot-path of the context field (e.g. "customer.age")
    pub field: String,

    /// Comparison operator
    pub operator: Operator,

    /// Expected value; ignored by `present` and `blank`
    #[serde(default)]
    pub expected: Value,
}

impl Condition {
    /// Create a new condition
    pub fn new(field: impl Into<String>, operator: Operator, expected: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            expected: expected.into(),
        }
    }

    /// `field is present`
    pub fn present(field: impl Into<String>) -> Self {
        Self::new(field, Operator::Present, Value::Missing)
    }

    /// `field is blank`
    pub fn blank(field: impl Into<String>) -> Self {
        Self::new(field, Operator::Blank, Value::Missing)
    }

    /// Fixed human-readable description, e.g. `risk_score < 0.7`
    pub fn description(&self) -> String {
        self.operator.describe(&self.field, &self.expected)
    }

    fn validate(&self) -> Result<(), StructuralError> {
        if self.field.trim().is_empty() {
            return Err(StructuralError::MissingField {
                field: "field".to_string(),
            });
        }
        if self.operator == Operator::In && !matches!(self.expected, Value::List(_)) {
            return Err(StructuralError::InvalidValue {
                field: self.field.clone(),
                message: format!(
                    "operator 'in' expects a list, got {}",
                    self.expected.kind_name()
                ),
            });
        }
        Ok(())
    }
}

/// Boolean combinator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinatorKind {
    /// Logical AND over all children
    All,
    /// Logical OR over all children
    Any,
    /// Negation of exactly one child
    Not,
}

impl CombinatorKind {
    pub fn name(self) -> &'static str {
        match self {
            CombinatorKind::All => "all",
            CombinatorKind::Any => "any",
            CombinatorKind::Not => "not",
        }
    }
}

impl fmt::Display for CombinatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of a condition tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionNode {
    /// Leaf condition
    Condition(Condition),

    /// Boolean combination of child nodes
    Combinator {
        kind: CombinatorKind,
        children: Vec<ConditionNode>,
    },
}

impl ConditionNode {
    /// Create a leaf node
    pub fn leaf(condition: Condition) -> Self {
        ConditionNode::Condition(condition)
    }

    /// Create an `all` node
    pub fn all(children: Vec<ConditionNode>) -> Self {
        ConditionNode::Combinator {
            kind: CombinatorKind::All,
            children,
        }
    }

    /// Create an `any` node
    pub fn any(children: Vec<ConditionNode>) -> Self {
        ConditionNode::Combinator {
            kind: CombinatorKind::Any,
            children,
        }
    }

    /// Create a `not` node
    pub fn not(child: ConditionNode) -> Self {
        ConditionNode::Combinator {
            kind: CombinatorKind::Not,
            children: vec![child],
        }
    }

    /// Check combinator arity, then every leaf condition, of the whole tree
    pub fn validate(&self) -> Result<(), StructuralError> {
        self.validate_arity()?;
        self.leaves().into_iter().try_for_each(Condition::validate)
    }

    fn validate_arity(&self) -> Result<(), StructuralError> {
        let ConditionNode::Combinator { kind, children } = self else {
            return Ok(());
        };
        let arity_ok = match kind {
            CombinatorKind::Not => children.len() == 1,
            CombinatorKind::All | CombinatorKind::Any => !children.is_empty(),
        };
        if !arity_ok {
            return Err(StructuralError::InvalidArity {
                kind: kind.name().to_string(),
                expected: match kind {
                    CombinatorKind::Not => "exactly 1",
                    _ => "at least 1",
                },
                actual: children.len(),
            });
        }
        children.iter().try_for_each(ConditionNode::validate_arity)
    }

    /// All leaf conditions in pre-order
    pub fn leaves(&self) -> Vec<&Condition> {
        let mut result = Vec::new();
        self.collect_leaves(&mut result);
        result
    }

    fn collect_leaves<'a>(&'a self, result: &mut Vec<&'a Condition>) {
        match self {
            ConditionNode::Condition(condition) => result.push(condition),
            ConditionNode::Combinator { children, .. } => {
                for child in children {
                    child.collect_leaves(result);
                }
            }
        }
    }
}

impl From<Condition> for ConditionNode {
    fn from(condition: Condition) -> Self {
        ConditionNode::Condition(condition)
    }
}
