//! YAML Parser
//!
//! Helpers for reading fields out of YAML (and JSON) definition documents.

use crate::error::{ParseError, Result};
use serde_yaml::Value as YamlValue;
use verdict_core::Value;

/// YAML parser utilities
pub struct YamlParser;

impl YamlParser {
    /// Parse a YAML string into a YAML value; JSON is accepted as YAML
    pub fn parse(yaml_str: &str) -> Result<YamlValue> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// Get a required string field from YAML object
    pub fn get_string(obj: &YamlValue, field: &str) -> Result<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ParseError::missing_field(field))
    }

    /// Get an optional string field from YAML object
    pub fn get_optional_string(obj: &YamlValue, field: &str) -> Option<String> {
        obj.get(field).and_then(|v| v.as_str()).map(|s| s.to_string())
    }

    /// Get an optional scalar field rendered as text (`version: 1.0` and
    /// `version: "1.0"` read the same)
    pub fn get_optional_scalar(obj: &YamlValue, field: &str) -> Option<String> {
        match obj.get(field)? {
            v @ (YamlValue::String(_) | YamlValue::Number(_) | YamlValue::Bool(_)) => {
                Some(Self::to_string(v))
            }
            _ => None,
        }
    }

    /// Get an optional float field; a present field of another kind is an error
    pub fn get_optional_f64(obj: &YamlValue, field: &str) -> Result<Option<f64>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| {
                ParseError::invalid_value(field, format!("expected a number, got {}", Self::to_string(v)))
            }),
        }
    }

    /// Get an optional integer field; a present field of another kind is an error
    pub fn get_optional_i64(obj: &YamlValue, field: &str) -> Result<Option<i64>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(v) => v.as_i64().map(Some).ok_or_else(|| {
                ParseError::invalid_value(field, format!("expected an integer, got {}", Self::to_string(v)))
            }),
        }
    }

    /// Get a required array field from YAML object
    pub fn get_array<'a>(obj: &'a YamlValue, field: &str) -> Result<&'a Vec<YamlValue>> {
        obj.get(field)
            .and_then(|v| v.as_sequence())
            .ok_or_else(|| ParseError::missing_field(field))
    }

    /// Get an optional array field from YAML object
    pub fn get_optional_array<'a>(obj: &'a YamlValue, field: &str) -> Option<&'a Vec<YamlValue>> {
        obj.get(field).and_then(|v| v.as_sequence())
    }

    /// Check if a field exists in YAML object
    pub fn has_field(obj: &YamlValue, field: &str) -> bool {
        obj.get(field).is_some()
    }

    /// Render a YAML value as text
    pub fn to_string(value: &YamlValue) -> String {
        match value {
            YamlValue::Null => "null".to_string(),
            YamlValue::Bool(b) => b.to_string(),
            YamlValue::Number(n) => n.to_string(),
            YamlValue::String(s) => s.clone(),
            YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
                serde_yaml::to_string(value).unwrap_or_default().trim_end().to_string()
            }
            YamlValue::Tagged(t) => Self::to_string(&t.value),
        }
    }

    /// Convert a YAML scalar or sequence into a runtime value.
    ///
    /// Mappings have no value counterpart and are rejected.
    pub fn to_value(value: &YamlValue, field: &str) -> Result<Value> {
        match value {
            YamlValue::Null => Ok(Value::Missing),
            YamlValue::Bool(b) => Ok(Value::Bool(*b)),
            YamlValue::Number(n) => n
                .as_f64()
                .map(Value::Number)
                .ok_or_else(|| ParseError::invalid_value(field, format!("unsupported number {}", n))),
            YamlValue::String(s) => Ok(Value::Text(s.clone())),
            YamlValue::Sequence(items) => items
                .iter()
                .map(|item| Self::to_value(item, field))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            YamlValue::Mapping(_) => Err(ParseError::invalid_value(
                field,
                "mappings cannot be used as values",
            )),
            YamlValue::Tagged(t) => Self::to_value(&t.value, field),
        }
    }
}
