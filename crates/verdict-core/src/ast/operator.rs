//! Condition operators

use crate::error::StructuralError;
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Operators usable in a leaf condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Equal (`field = value`)
    Eq,
    /// Not equal (`field != value`)
    Neq,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Membership in an expected list
    In,
    /// List membership or substring
    Contains,
    /// Field bound and not blank
    Present,
    /// Field missing, empty text or empty list
    Blank,
}

impl Operator {
    pub const ALL: [Operator; 10] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::Contains,
        Operator::Present,
        Operator::Blank,
    ];

    /// Canonical name as written in rule definitions
    pub fn name(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Contains => "contains",
            Operator::Present => "present",
            Operator::Blank => "blank",
        }
    }

    /// Returns true if this operator orders its operands
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte
        )
    }

    /// Returns true if the expected value is ignored
    pub fn ignores_expected(self) -> bool {
        matches!(self, Operator::Present | Operator::Blank)
    }

    pub(crate) fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Render the fixed description of a condition using this operator
    pub fn describe(self, field: &str, expected: &Value) -> String {
        let value = expected.render();
        match self {
            Operator::Eq => format!("{} = {}", field, value),
            Operator::Neq => format!("{} != {}", field, value),
            Operator::Gt => format!("{} > {}", field, value),
            Operator::Gte => format!("{} >= {}", field, value),
            Operator::Lt => format!("{} < {}", field, value),
            Operator::Lte => format!("{} <= {}", field, value),
            Operator::In => format!("{} in {}", field, value),
            Operator::Contains => format!("{} contains {}", field, value),
            Operator::Present => format!("{} is present", field),
            Operator::Blank => format!("{} is blank", field),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = StructuralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "eq" | "=" | "==" => Ok(Operator::Eq),
            "neq" | "!=" => Ok(Operator::Neq),
            "gt" | ">" => Ok(Operator::Gt),
            "gte" | ">=" => Ok(Operator::Gte),
            "lt" | "<" => Ok(Operator::Lt),
            "lte" | "<=" => Ok(Operator::Lte),
            "in" => Ok(Operator::In),
            "contains" => Ok(Operator::Contains),
            "present" => Ok(Operator::Present),
            "blank" => Ok(Operator::Blank),
            other => Err(StructuralError::UnknownOperator(other.to_string())),
        }
    }
}
