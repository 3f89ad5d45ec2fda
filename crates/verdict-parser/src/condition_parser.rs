//! Condition tree parser
//!
//! Parses `when` blocks of rule definitions:
//!
//! ```yaml
//! when:
//!   all:
//!     - { field: risk_score, op: lt, value: 0.7 }
//!     - any:
//!         - "status in [\"active\", \"pending\"]"
//!         - not: { field: email, op: blank }
//! ```
//!
//! A leaf is either a `{field, op, value}` mapping (`operator` is accepted
//! for `op`) or a shorthand string comparing a field with a literal.

use crate::error::{ParseError, Result};
use crate::expression::ExpressionParser;
use crate::yaml_parser::YamlParser;
use serde_yaml::Value as YamlValue;
use verdict_core::ast::{CombinatorKind, Condition, ConditionNode, Expression, Operator};
use verdict_core::Value;

/// Condition tree parser
pub struct ConditionParser;

impl ConditionParser {
    /// Parse a condition tree from a YAML value
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<ConditionNode> {
        match yaml {
            YamlValue::String(text) => Self::parse_shorthand(text).map(ConditionNode::leaf),
            YamlValue::Mapping(_) => Self::parse_mapping(yaml),
            other => Err(ParseError::invalid_value(
                "when",
                format!("expected a condition, got '{}'", YamlParser::to_string(other)),
            )),
        }
    }

    fn parse_mapping(yaml: &YamlValue) -> Result<ConditionNode> {
        for kind in [CombinatorKind::All, CombinatorKind::Any, CombinatorKind::Not] {
            if let Some(children) = yaml.get(kind.name()) {
                return Self::parse_combinator(kind, children);
            }
        }

        if YamlParser::has_field(yaml, "field") {
            return Self::parse_leaf(yaml).map(ConditionNode::leaf);
        }

        Err(ParseError::invalid_value(
            "when",
            "expected 'all', 'any', 'not' or a 'field' condition",
        ))
    }

    fn parse_combinator(kind: CombinatorKind, children: &YamlValue) -> Result<ConditionNode> {
        let children = match (kind, children) {
            (_, YamlValue::Sequence(items)) => items
                .iter()
                .map(Self::parse_from_yaml)
                .collect::<Result<Vec<_>>>()?,
            // `not` may take its single child directly
            (CombinatorKind::Not, child) => vec![Self::parse_from_yaml(child)?],
            _ => {
                return Err(ParseError::invalid_value(
                    kind.name(),
                    "expected a list of conditions",
                ))
            }
        };

        Ok(ConditionNode::Combinator { kind, children })
    }

    fn parse_leaf(yaml: &YamlValue) -> Result<Condition> {
        let field = YamlParser::get_string(yaml, "field")?;
        let op = YamlParser::get_optional_string(yaml, "op")
            .or_else(|| YamlParser::get_optional_string(yaml, "operator"))
            .ok_or_else(|| ParseError::missing_field(format!("{}.op", field)))?;
        let operator: Operator = op.parse()?;

        let expected = match yaml.get("value") {
            Some(value) => YamlParser::to_value(value, &field)?,
            None if operator.ignores_expected() => Value::Missing,
            None => return Err(ParseError::missing_field(format!("{}.value", field))),
        };

        Ok(Condition::new(field, operator, expected))
    }

    /// Parse `"field op literal"`, `"field is present"` or `"field is blank"`
    pub fn parse_shorthand(text: &str) -> Result<Condition> {
        let trimmed = text.trim();
        if let Some(field) = trimmed.strip_suffix(" is present") {
            return Ok(Condition::present(field.trim()));
        }
        if let Some(field) = trimmed.strip_suffix(" is blank") {
            return Ok(Condition::blank(field.trim()));
        }

        let shape_error = || {
            ParseError::invalid_value(
                "when",
                format!("'{}' must compare a field with a literal value", trimmed),
            )
        };

        match ExpressionParser::parse(trimmed)? {
            Expression::Binary { left, op, right } => {
                let field = match *left {
                    Expression::Path(segments) => segments.join("."),
                    _ => return Err(shape_error()),
                };
                let operator = op.as_condition_operator().ok_or_else(shape_error)?;
                let expected = Self::literal_value(&right).ok_or_else(shape_error)?;
                Ok(Condition::new(field, operator, expected))
            }
            _ => Err(shape_error()),
        }
    }

    fn literal_value(expression: &Expression) -> Option<Value> {
        match expression {
            Expression::Literal(value) => Some(value.clone()),
            Expression::List(items) => items
                .iter()
                .map(Self::literal_value)
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            _ => None,
        }
    }
}
