//! DMN decision table definitions

use super::expression::Expression;
use crate::error::StructuralError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Rule for resolving multiple matching rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitPolicy {
    /// At most one row may match
    Unique,
    /// First matching row in table order wins
    First,
    /// Several rows may match if they agree on the output
    Any,
    /// Matching row with the highest declared priority wins
    Priority,
    /// Every matching row contributes
    Collect,
}

impl HitPolicy {
    pub fn name(self) -> &'static str {
        match self {
            HitPolicy::Unique => "unique",
            HitPolicy::First => "first",
            HitPolicy::Any => "any",
            HitPolicy::Priority => "priority",
            HitPolicy::Collect => "collect",
        }
    }
}

impl fmt::Display for HitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HitPolicy {
    type Err = StructuralError;

    /// Accepts full names and the DMN single-letter forms (`U`, `F`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unique" | "u" => Ok(HitPolicy::Unique),
            "first" | "f" => Ok(HitPolicy::First),
            "any" | "a" => Ok(HitPolicy::Any),
            "priority" | "p" => Ok(HitPolicy::Priority),
            "collect" | "c" => Ok(HitPolicy::Collect),
            _ => Err(StructuralError::InvalidValue {
                field: "hit_policy".to_string(),
                message: format!("unknown hit policy '{}'", s),
            }),
        }
    }
}

/// Input column
///
/// With an expression, the column's cells are unary tests against its value.
/// Without one, cells are standalone boolean expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputClause {
    /// Name used as the field in traces and descriptions
    pub label: String,

    /// Input expression evaluated once per decision
    pub expression: Option<Expression>,
}

impl InputClause {
    /// Column whose label is the rendered input expression
    pub fn new(expression: Expression) -> Self {
        Self {
            label: expression.to_string(),
            expression: Some(expression),
        }
    }

    /// Column of standalone boolean cells
    pub fn boolean(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            expression: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Output column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputClause {
    pub name: String,
}

impl OutputClause {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A decision table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row ID, reported as the rule ID in traces
    pub id: String,

    /// One entry per input column; `None` is a wildcard (`-`)
    pub input_entries: Vec<Option<Expression>>,

    /// One expression per output column
    pub output_entries: Vec<Expression>,

    /// Used by the `priority` hit policy, higher wins
    #[serde(default)]
    pub priority: i64,

    /// Contribution weight in [0, 1]
    pub weight: f64,

    /// Optional annotation, reported as the reason
    pub description: Option<String>,
}

impl TableRow {
    /// Create a row with priority 0 and weight 1.0
    pub fn new(
        id: impl Into<String>,
        input_entries: Vec<Option<Expression>>,
        output_entries: Vec<Expression>,
    ) -> Self {
        Self {
            id: id.into(),
            input_entries,
            output_entries,
            priority: 0,
            weight: 1.0,
            description: None,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A validated decision table; read-only after construction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionTable {
    id: String,
    hit_policy: HitPolicy,
    inputs: Vec<InputClause>,
    outputs: Vec<OutputClause>,
    rows: Vec<TableRow>,
}

impl DecisionTable {
    /// Validate and build a decision table
    pub fn new(
        id: impl Into<String>,
        hit_policy: HitPolicy,
        inputs: Vec<InputClause>,
        outputs: Vec<OutputClause>,
        rows: Vec<TableRow>,
    ) -> Result<Self, StructuralError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(StructuralError::MissingField {
                field: "decision".to_string(),
            });
        }
        if outputs.is_empty() {
            return Err(StructuralError::MissingField {
                field: format!("{}.outputs", id),
            });
        }

        let mut seen = HashSet::new();
        for row in &rows {
            if !seen.insert(row.id.as_str()) {
                return Err(StructuralError::DuplicateId {
                    id: row.id.clone(),
                    scope: format!("decision table '{}'", id),
                });
            }
            Self::validate_row(row, &inputs, &outputs)?;
        }

        log::debug!(
            "validated decision table '{}' ({} hit policy, {} rows)",
            id,
            hit_policy,
            rows.len()
        );

        Ok(Self {
            id,
            hit_policy,
            inputs,
            outputs,
            rows,
        })
    }

    fn validate_row(
        row: &TableRow,
        inputs: &[InputClause],
        outputs: &[OutputClause],
    ) -> Result<(), StructuralError> {
        if row.input_entries.len() != inputs.len() {
            return Err(StructuralError::ShapeMismatch {
                row: row.id.clone(),
                what: "input",
                expected: inputs.len(),
                actual: row.input_entries.len(),
            });
        }
        if row.output_entries.len() != outputs.len() {
            return Err(StructuralError::ShapeMismatch {
                row: row.id.clone(),
                what: "output",
                expected: outputs.len(),
                actual: row.output_entries.len(),
            });
        }
        if !(0.0..=1.0).contains(&row.weight) {
            return Err(StructuralError::InvalidWeight {
                id: row.id.clone(),
                weight: row.weight,
            });
        }
        for (clause, entry) in inputs.iter().zip(&row.input_entries) {
            if let (None, Some(cell)) = (&clause.expression, entry) {
                if cell.references_input() {
                    return Err(StructuralError::InvalidValue {
                        field: format!("{}.{}", row.id, clause.label),
                        message: "'?' used in a column without an input expression".to_string(),
                    });
                }
            }
        }
        if let Some(cell) = row.output_entries.iter().find(|e| e.references_input()) {
            return Err(StructuralError::InvalidValue {
                field: format!("{}.outputs", row.id),
                message: format!("output entry '{}' cannot use '?'", cell),
            });
        }
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hit_policy(&self) -> HitPolicy {
        self.hit_policy
    }

    pub fn inputs(&self) -> &[InputClause] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputClause] {
        &self.outputs
    }

    /// Rows in table order
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOperator;

    fn under(limit: i32) -> Expression {
        Expression::binary(Expression::Input, BinaryOperator::Lt, Expression::literal(limit))
    }

    fn age_table(rows: Vec<TableRow>) -> Result<DecisionTable, StructuralError> {
        DecisionTable::new(
            "eligibility",
            HitPolicy::Unique,
            vec![InputClause::new(Expression::path("customer.age"))],
            vec![OutputClause::new("decision")],
            rows,
        )
    }

    #[test]
    fn test_hit_policy_parsing() {
        assert_eq!("UNIQUE".parse::<HitPolicy>().unwrap(), HitPolicy::Unique);
        assert_eq!("P".parse::<HitPolicy>().unwrap(), HitPolicy::Priority);
        assert!("rule order".parse::<HitPolicy>().is_err());
    }

    #[test]
    fn test_table_creation() {
        let table = age_table(vec![TableRow::new(
            "minor",
            vec![Some(under(18))],
            vec![Expression::literal("denied")],
        )])
        .unwrap();

        assert_eq!(table.id(), "eligibility");
        assert_eq!(table.inputs()[0].label, "customer.age");
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn test_row_shape_mismatch() {
        let err = age_table(vec![TableRow::new(
            "minor",
            vec![Some(under(18)), None],
            vec![Expression::literal("denied")],
        )])
        .unwrap_err();
        assert!(matches!(err, StructuralError::ShapeMismatch { what: "input", .. }));

        let err = age_table(vec![TableRow::new("minor", vec![None], vec![])]).unwrap_err();
        assert!(matches!(err, StructuralError::ShapeMismatch { what: "output", .. }));
    }

    #[test]
    fn test_duplicate_rows() {
        let row = TableRow::new("r", vec![None], vec![Expression::literal("x")]);
        let err = age_table(vec![row.clone(), row]).unwrap_err();
        assert!(matches!(err, StructuralError::DuplicateId { .. }));
    }

    #[test]
    fn test_input_placeholder_needs_input_expression() {
        let err = DecisionTable::new(
            "t",
            HitPolicy::First,
            vec![InputClause::boolean("check")],
            vec![OutputClause::new("decision")],
            vec![TableRow::new("r", vec![Some(under(3))], vec![Expression::literal("x")])],
        )
        .unwrap_err();
        assert!(matches!(err, StructuralError::InvalidValue { .. }));
    }

    #[test]
    fn test_row_weight_validated() {
        let row = TableRow::new("r", vec![None], vec![Expression::literal("x")]).with_weight(-0.1);
        assert!(matches!(
            age_table(vec![row]),
            Err(StructuralError::InvalidWeight { .. })
        ));
    }
}
