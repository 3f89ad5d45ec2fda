//! Evaluation context
//!
//! An immutable mapping from dot-path field names to values, built once per
//! decision.

use crate::error::{Result, RuntimeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use verdict_core::Value;

static MISSING: Value = Value::Missing;

/// Facts a decision is evaluated against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    fields: BTreeMap<String, Value>,
}

impl Context {
    /// Create a context from a flat map of dot-path fields
    pub fn new(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Build a context from a JSON object.
    ///
    /// Nested objects are flattened into dot paths, so
    /// `{"customer": {"age": 30}}` binds `customer.age`.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json.as_object().ok_or_else(|| {
            RuntimeError::TypeMismatch("context must be a JSON object".to_string())
        })?;
        let mut fields = BTreeMap::new();
        Self::flatten(None, object, &mut fields)?;
        Ok(Self { fields })
    }

    fn flatten(
        prefix: Option<&str>,
        object: &serde_json::Map<String, serde_json::Value>,
        fields: &mut BTreeMap<String, Value>,
    ) -> Result<()> {
        for (key, value) in object {
            let path = match prefix {
                Some(prefix) => format!("{}.{}", prefix, key),
                None => key.clone(),
            };
            match value {
                serde_json::Value::Object(nested) => Self::flatten(Some(&path), nested, fields)?,
                other => {
                    fields.insert(path, Value::from_json(other)?);
                }
            }
        }
        Ok(())
    }

    /// Value at `path`; absent fields read as `Missing`
    pub fn get(&self, path: &str) -> &Value {
        self.fields.get(path).unwrap_or(&MISSING)
    }

    /// Value at `path`, or `None` if the field is not bound at all
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        self.fields.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
