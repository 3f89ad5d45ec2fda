//! Decision table parser
//!
//! Parses DMN decision table documents (YAML or JSON):
//!
//! ```yaml
//! decision: eligibility
//! hit_policy: unique
//! inputs: [ { expression: customer.age }, { expression: customer.tier } ]
//! outputs: [ decision ]
//! rules:
//!   - id: r1
//!     inputs: [ "< 18", "-" ]
//!     outputs: [ '"denied"' ]
//!     weight: 1.0
//!     priority: 1
//!     description: Minors are not eligible
//! ```
//!
//! Input cells are DMN unary tests against the column's input expression.
//! Columns declared without an expression (or tables without `inputs`)
//! take full boolean FEEL expressions. Output cells are FEEL expressions;
//! non-string YAML scalars are taken literally.

use crate::error::{ParseError, Result};
use crate::expression::ExpressionParser;
use crate::yaml_parser::YamlParser;
use serde_yaml::Value as YamlValue;
use verdict_core::ast::{DecisionTable, Expression, HitPolicy, InputClause, OutputClause, TableRow};

/// Decision table parser
pub struct DecisionTableParser;

impl DecisionTableParser {
    /// Parse a decision table from YAML or JSON text
    pub fn parse(content: &str) -> Result<DecisionTable> {
        let yaml = YamlParser::parse(content)?;
        Self::parse_from_yaml(&yaml)
    }

    /// Parse a decision table from a YAML value
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<DecisionTable> {
        let id = YamlParser::get_optional_string(yaml, "decision")
            .or_else(|| YamlParser::get_optional_string(yaml, "id"))
            .ok_or_else(|| ParseError::missing_field("decision"))?;

        let hit_policy = match YamlParser::get_optional_string(yaml, "hit_policy") {
            Some(policy) => policy.parse::<HitPolicy>()?,
            None => HitPolicy::Unique,
        };

        let rows_yaml = YamlParser::get_array(yaml, "rules")?;

        let inputs = match YamlParser::get_optional_array(yaml, "inputs") {
            Some(clauses) => clauses
                .iter()
                .enumerate()
                .map(|(i, clause)| Self::parse_input_clause(clause, i))
                .collect::<Result<Vec<_>>>()?,
            None => Self::boolean_columns(rows_yaml),
        };

        let outputs = YamlParser::get_array(yaml, "outputs")?
            .iter()
            .map(Self::parse_output_clause)
            .collect::<Result<Vec<_>>>()?;

        let rows = rows_yaml
            .iter()
            .enumerate()
            .map(|(i, row)| Self::parse_row(row, i, &inputs))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "parsed decision table '{}' ({} hit policy, {} inputs, {} rows)",
            id,
            hit_policy,
            inputs.len(),
            rows.len()
        );

        Ok(DecisionTable::new(id, hit_policy, inputs, outputs, rows)?)
    }

    fn parse_input_clause(yaml: &YamlValue, index: usize) -> Result<InputClause> {
        match yaml {
            YamlValue::String(text) => Ok(InputClause::new(ExpressionParser::parse(text)?)),
            YamlValue::Mapping(_) => {
                let label = YamlParser::get_optional_string(yaml, "label");
                match YamlParser::get_optional_string(yaml, "expression") {
                    Some(text) => {
                        let clause = InputClause::new(ExpressionParser::parse(&text)?);
                        Ok(match label {
                            Some(label) => clause.with_label(label),
                            None => clause,
                        })
                    }
                    None => Ok(InputClause::boolean(
                        label.unwrap_or_else(|| Self::column_label(index)),
                    )),
                }
            }
            other => Err(ParseError::invalid_value(
                "inputs",
                format!("expected an input clause, got '{}'", YamlParser::to_string(other)),
            )),
        }
    }

    /// One boolean column per cell of the widest row
    fn boolean_columns(rows: &[YamlValue]) -> Vec<InputClause> {
        let width = rows
            .iter()
            .filter_map(|row| YamlParser::get_optional_array(row, "inputs"))
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        (0..width)
            .map(|i| InputClause::boolean(Self::column_label(i)))
            .collect()
    }

    fn column_label(index: usize) -> String {
        format!("input_{}", index + 1)
    }

    fn parse_output_clause(yaml: &YamlValue) -> Result<OutputClause> {
        match yaml {
            YamlValue::String(name) => Ok(OutputClause::new(name.clone())),
            YamlValue::Mapping(_) => Ok(OutputClause::new(YamlParser::get_string(yaml, "name")?)),
            other => Err(ParseError::invalid_value(
                "outputs",
                format!("expected an output name, got '{}'", YamlParser::to_string(other)),
            )),
        }
    }

    fn parse_row(yaml: &YamlValue, index: usize, inputs: &[InputClause]) -> Result<TableRow> {
        let id = YamlParser::get_optional_scalar(yaml, "id")
            .unwrap_or_else(|| format!("row_{}", index + 1));

        let input_entries = match YamlParser::get_optional_array(yaml, "inputs") {
            Some(cells) => cells
                .iter()
                .enumerate()
                .map(|(column, cell)| {
                    let is_boolean = inputs.get(column).is_some_and(|c| c.expression.is_none());
                    Self::parse_input_cell(cell, is_boolean)
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let output_entries = match yaml.get("outputs") {
            Some(YamlValue::Sequence(cells)) => cells
                .iter()
                .map(Self::parse_output_cell)
                .collect::<Result<Vec<_>>>()?,
            Some(single) => vec![Self::parse_output_cell(single)?],
            None => return Err(ParseError::missing_field(format!("{}.outputs", id))),
        };

        let mut row = TableRow::new(id, input_entries, output_entries)
            .with_priority(YamlParser::get_optional_i64(yaml, "priority")?.unwrap_or(0))
            .with_weight(YamlParser::get_optional_f64(yaml, "weight")?.unwrap_or(1.0));
        if let Some(description) = YamlParser::get_optional_string(yaml, "description") {
            row = row.with_description(description);
        }
        Ok(row)
    }

    fn parse_input_cell(cell: &YamlValue, is_boolean: bool) -> Result<Option<Expression>> {
        let text = match cell {
            YamlValue::Null => return Ok(None),
            other => YamlParser::to_string(other),
        };
        if !is_boolean {
            return ExpressionParser::parse_unary_tests(&text);
        }
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "-" {
            Ok(None)
        } else {
            ExpressionParser::parse(trimmed).map(Some)
        }
    }

    fn parse_output_cell(cell: &YamlValue) -> Result<Expression> {
        match cell {
            YamlValue::String(text) => ExpressionParser::parse(text),
            other => Ok(Expression::Literal(YamlParser::to_value(other, "outputs")?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_core::{BinaryOperator, StructuralError};

    const ELIGIBILITY: &str = r#"
decision: eligibility
hit_policy: first
inputs:
  - { expression: customer.age }
  - { expression: customer.tier, label: tier }
outputs: [ decision ]
rules:
  - id: minor
    inputs: [ "< 18", "-" ]
    outputs: [ '"denied"' ]
    description: Minors are not eligible
  - id: gold
    inputs: [ "[18..65)", '"gold"' ]
    outputs: [ '"approved"' ]
    weight: 0.9
    priority: 2
  - inputs: [ 70, "-" ]
    outputs: [ '"review"' ]
"#;

    #[test]
    fn test_parse_table() {
        let table = DecisionTableParser::parse(ELIGIBILITY).unwrap();

        assert_eq!(table.id(), "eligibility");
        assert_eq!(table.hit_policy(), HitPolicy::First);
        assert_eq!(table.inputs()[0].label, "customer.age");
        assert_eq!(table.inputs()[1].label, "tier");
        assert_eq!(table.outputs()[0].name, "decision");

        let rows = table.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].description.as_deref(), Some("Minors are not eligible"));
        assert_eq!(rows[0].input_entries[1], None);
        assert_eq!(rows[1].weight, 0.9);
        assert_eq!(rows[1].priority, 2);
        assert_eq!(rows[2].id, "row_3");
        assert_eq!(
            rows[2].input_entries[0],
            Some(Expression::binary(
                Expression::Input,
                BinaryOperator::Eq,
                Expression::literal(70)
            ))
        );
        assert_eq!(rows[0].output_entries[0], Expression::literal("denied"));
    }

    #[test]
    fn test_boolean_columns_without_inputs() {
        let yaml = r#"
decision: flags
hit_policy: collect
outputs: [ flag ]
rules:
  - inputs: [ "amount > 1000 and country != \"US\"" ]
    outputs: [ '"review"' ]
  - inputs: [ "-" ]
    outputs: 1
"#;
        let table = DecisionTableParser::parse(yaml).unwrap();
        assert_eq!(table.inputs().len(), 1);
        assert!(table.inputs()[0].expression.is_none());
        assert_eq!(table.inputs()[0].label, "input_1");
        assert_eq!(table.rows()[1].input_entries[0], None);
        assert_eq!(table.rows()[1].output_entries[0], Expression::literal(1));
    }

    #[test]
    fn test_invalid_tables() {
        let bad_policy = "decision: t\nhit_policy: rule_order\noutputs: [a]\nrules: []\n";
        assert!(DecisionTableParser::parse(bad_policy).is_err());

        let bad_shape = "decision: t\ninputs: [x, y]\noutputs: [a]\nrules:\n  - inputs: [\"1\"]\n    outputs: [1]\n";
        assert!(matches!(
            DecisionTableParser::parse(bad_shape),
            Err(ParseError::Structural(StructuralError::ShapeMismatch { .. }))
        ));

        let bad_cell = "decision: t\ninputs: [x]\noutputs: [a]\nrules:\n  - inputs: [\"< \"]\n    outputs: [1]\n";
        assert!(matches!(
            DecisionTableParser::parse(bad_cell),
            Err(ParseError::ExpressionSyntax { .. })
        ));

        let unknown_function = "decision: t\ninputs: [\"shout(x)\"]\noutputs: [a]\nrules: []\n";
        assert!(DecisionTableParser::parse(unknown_function).is_err());
    }
}
