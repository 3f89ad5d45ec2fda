//! Runtime value types
//!
//! The `Value` enum is the closed set of kinds a context field or a FEEL
//! expression can produce. The comparison semantics of the condition
//! operators are defined here so both rule styles agree on them.

use crate::ast::Operator;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Runtime value type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent field or null; never equal to anything, itself included
    #[default]
    Missing,
    /// Boolean value
    Bool(bool),
    /// Number value (f64 handles both int and float)
    Number(f64),
    /// Text value
    Text(String),
    /// Ordered list of values
    List(Vec<Value>),
}

impl Value {
    /// Name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Missing => "missing",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Missing, empty text and empty lists are blank
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Text(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Kind-aware equality used by `eq`, `in` and `contains`.
    ///
    /// Values of different kinds are unequal, lists compare element-wise and
    /// `Missing` is unequal to everything.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Text(l), Value::Text(r)) => l == r,
            (Value::List(l), Value::List(r)) => {
                l.len() == r.len() && l.iter().zip(r).all(|(a, b)| a.equals(b))
            }
            _ => false,
        }
    }

    /// Ordering between two values for the ordering operators.
    ///
    /// Returns `Ok(None)` when either side is `Missing` (or a number is NaN),
    /// which the operators treat as a plain `false`.
    pub fn ordering(&self, other: &Value, operator: Operator) -> Result<Option<Ordering>> {
        match (self, other) {
            (Value::Missing, _) | (_, Value::Missing) => Ok(None),
            (Value::Number(l), Value::Number(r)) => Ok(l.partial_cmp(r)),
            (Value::Text(l), Value::Text(r)) => Ok(Some(l.cmp(r))),
            _ => Err(CoreError::TypeMismatch {
                operator: operator.name().to_string(),
                left: self.kind_name(),
                right: other.kind_name(),
            }),
        }
    }

    /// Apply a condition operator with `self` as the actual value.
    pub fn compare(&self, operator: Operator, expected: &Value) -> Result<bool> {
        match operator {
            Operator::Eq => Ok(self.equals(expected)),
            Operator::Neq => Ok(!self.equals(expected)),
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => Ok(self
                .ordering(expected, operator)?
                .map(|ordering| operator.accepts(ordering))
                .unwrap_or(false)),
            Operator::In => match expected {
                Value::List(items) => Ok(items.iter().any(|item| self.equals(item))),
                Value::Missing => Ok(false),
                other => Err(CoreError::TypeMismatch {
                    operator: operator.name().to_string(),
                    left: self.kind_name(),
                    right: other.kind_name(),
                }),
            },
            Operator::Contains => match (self, expected) {
                (Value::List(items), _) => Ok(items.iter().any(|item| item.equals(expected))),
                (Value::Text(text), Value::Text(needle)) => Ok(text.contains(needle.as_str())),
                (Value::Missing, _) | (Value::Text(_), Value::Missing) => Ok(false),
                _ => Err(CoreError::TypeMismatch {
                    operator: operator.name().to_string(),
                    left: self.kind_name(),
                    right: expected.kind_name(),
                }),
            },
            Operator::Present => Ok(!self.is_blank()),
            Operator::Blank => Ok(self.is_blank()),
        }
    }

    /// Literal text used in condition descriptions.
    ///
    /// Numbers use their shortest display form (`180`, `0.7`), text is double
    /// quoted and lists are rendered without spaces: `["active","pending"]`.
    pub fn render(&self) -> String {
        match self {
            Value::Missing => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Text(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::render).collect();
                format!("[{}]", parts.join(","))
            }
        }
    }

    /// Label form of a value: text without quotes, anything else rendered.
    pub fn to_label(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            other => other.render(),
        }
    }

    /// Convert a JSON value. Objects have no counterpart and are rejected.
    pub fn from_json(json: &serde_json::Value) -> Result<Value> {
        match json {
            serde_json::Value::Null => Ok(Value::Missing),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Value::Number)
                .ok_or_else(|| CoreError::UnsupportedValue(n.to_string())),
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Value::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            serde_json::Value::Object(_) => Err(CoreError::UnsupportedValue(
                "objects cannot be used as values".to_string(),
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_missing_never_equals() {
        assert!(!Value::Missing.equals(&Value::Missing));
        assert!(!Value::Missing.compare(Operator::Eq, &Value::Missing).unwrap());
        assert!(Value::Missing.compare(Operator::Neq, &Value::Missing).unwrap());
    }

    #[test]
    fn test_numeric_equality() {
        assert!(Value::from(180).equals(&Value::Number(180.0)));
        assert!(!Value::Number(1.0).equals(&text("1")));
    }

    #[test]
    fn test_list_equality_is_element_wise() {
        let left = Value::from(vec!["a", "b"]);
        assert!(left.equals(&Value::from(vec!["a", "b"])));
        assert!(!left.equals(&Value::from(vec!["b", "a"])));
        assert!(!Value::List(vec![Value::Missing]).equals(&Value::List(vec![Value::Missing])));
    }

    #[test]
    fn test_ordering_operators() {
        let five = Value::Number(5.0);
        assert!(five.compare(Operator::Gt, &Value::Number(3.0)).unwrap());
        assert!(five.compare(Operator::Gte, &Value::Number(5.0)).unwrap());
        assert!(!five.compare(Operator::Lt, &Value::Number(5.0)).unwrap());
        assert!(five.compare(Operator::Lte, &Value::Number(5.0)).unwrap());
        assert!(text("apple").compare(Operator::Lt, &text("banana")).unwrap());
    }

    #[test]
    fn test_ordering_on_missing_is_false() {
        assert!(!Value::Missing.compare(Operator::Gt, &Value::Number(1.0)).unwrap());
        assert!(!Value::Number(1.0).compare(Operator::Lte, &Value::Missing).unwrap());
    }

    #[test]
    fn test_ordering_type_mismatch() {
        let err = Value::Bool(true)
            .compare(Operator::Gt, &Value::Bool(false))
            .unwrap_err();
        assert!(matches!(err, CoreError::TypeMismatch { left: "boolean", .. }));

        let err = Value::from(vec![1, 2])
            .compare(Operator::Lt, &Value::Number(3.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::TypeMismatch { left: "list", .. }));

        assert!(Value::Number(1.0).compare(Operator::Gt, &text("1")).is_err());
    }

    #[test]
    fn test_in_operator() {
        let allowed = Value::from(vec!["active", "pending"]);
        assert!(text("active").compare(Operator::In, &allowed).unwrap());
        assert!(!text("closed").compare(Operator::In, &allowed).unwrap());
        assert!(!Value::Missing.compare(Operator::In, &allowed).unwrap());
        assert!(text("active").compare(Operator::In, &text("active")).is_err());
    }

    #[test]
    fn test_contains_operator() {
        let tags = Value::from(vec!["premium", "beta"]);
        assert!(tags.compare(Operator::Contains, &text("premium")).unwrap());
        assert!(!tags.compare(Operator::Contains, &text("gold")).unwrap());
        assert!(text("hello world").compare(Operator::Contains, &text("lo w")).unwrap());
        assert!(!Value::Missing.compare(Operator::Contains, &text("x")).unwrap());
        assert!(Value::Number(12.0).compare(Operator::Contains, &Value::Number(1.0)).is_err());
        assert!(text("abc").compare(Operator::Contains, &Value::Number(1.0)).is_err());
    }

    #[test]
    fn test_present_and_blank_are_complements() {
        let samples = vec![
            Value::Missing,
            text(""),
            text("x"),
            Value::List(vec![]),
            Value::from(vec![1]),
            Value::Bool(false),
            Value::Number(0.0),
        ];
        for sample in samples {
            let present = sample.compare(Operator::Present, &Value::Missing).unwrap();
            let blank = sample.compare(Operator::Blank, &Value::Missing).unwrap();
            assert_ne!(present, blank, "{:?}", sample);
        }
        assert!(!text("").compare(Operator::Present, &Value::Missing).unwrap());
        assert!(Value::List(vec![]).compare(Operator::Blank, &Value::Missing).unwrap());
    }

    #[test]
    fn test_render() {
        assert_eq!(Value::Number(180.0).render(), "180");
        assert_eq!(Value::Number(0.7).render(), "0.7");
        assert_eq!(text("active").render(), "\"active\"");
        assert_eq!(
            Value::from(vec!["active", "pending"]).render(),
            "[\"active\",\"pending\"]"
        );
        assert_eq!(Value::Missing.render(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(text("say \"hi\"").render(), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_to_label() {
        assert_eq!(text("approved").to_label(), "approved");
        assert_eq!(Value::Number(2.0).to_label(), "2");
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!([1, "a", true, null]);
        let value = Value::from_json(&json).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Number(1.0),
                text("a"),
                Value::Bool(true),
                Value::Missing
            ])
        );
        assert!(Value::from_json(&serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn test_value_serde_json() {
        let value = Value::List(vec![Value::Number(42.0), text("x"), Value::Missing]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "[42.0,\"x\",null]");

        let back: Value = serde_json::from_str("[42,\"x\",null]").unwrap();
        assert_eq!(back, value);
    }
}
