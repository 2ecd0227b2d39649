//! @acp:module "Form Field Values"
//! @acp:summary "Submitted field values with string coercion for condition checks"
//! @acp:domain forms
//! @acp:layer model

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single submitted value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox-like fields
    Flag(bool),
    Text(String),
}

impl FieldValue {
    /// String form used by `===` / `!==` comparisons.
    /// Flags follow the `'1'` / `''` convention.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Flag(true) => Cow::Borrowed("1"),
            FieldValue::Flag(false) => Cow::Borrowed(""),
            FieldValue::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Whether a checkbox submitted with this value counts as checked
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Flag(b) => *b,
            FieldValue::Text(s) => !s.is_empty() && s != "0",
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => FieldValue::Flag(*b),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Null => FieldValue::Text(String::new()),
            Value::Number(n) => FieldValue::Text(n.to_string()),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

/// Field name to submitted value, populated once per request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Value>", into = "HashMap<String, FieldValue>")]
pub struct FieldValues {
    values: HashMap<String, FieldValue>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Coerced string value; absent fields read as the empty string
    pub fn text(&self, name: &str) -> Cow<'_, str> {
        self.values
            .get(name)
            .map(FieldValue::as_text)
            .unwrap_or(Cow::Borrowed(""))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Load values from a JSON object, coercing scalars
    pub fn from_json(value: &Value) -> crate::Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            crate::Error::UnsupportedFormat("field values must be a JSON object".to_string())
        })?;
        Ok(map
            .iter()
            .map(|(k, v)| (k.clone(), FieldValue::from(v)))
            .collect())
    }
}

impl From<HashMap<String, Value>> for FieldValues {
    fn from(raw: HashMap<String, Value>) -> Self {
        raw.iter()
            .map(|(k, v)| (k.clone(), FieldValue::from(v)))
            .collect()
    }
}

impl From<FieldValues> for HashMap<String, FieldValue> {
    fn from(values: FieldValues) -> Self {
        values.values
    }
}

impl FromIterator<(String, FieldValue)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
