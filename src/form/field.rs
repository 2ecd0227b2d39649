//! @acp:module "Form Fields"
//! @acp:summary "Field descriptors and hidden/disabled state resolution"
//! @acp:domain forms
//! @acp:layer service

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::condition::{Condition, ValidationError};
use super::values::{FieldValue, FieldValues};

fn default_field_type() -> String {
    "text".to_string()
}

/// Declarative field configuration as loaded from disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Raw condition, validated by [`Form::from_descriptor`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_if: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_if: Option<Value>,
}

/// A whole form: fields in declaration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDescriptor {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    /// Load a descriptor from a `.json`, `.yaml` or `.yml` file
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("json") | None => Ok(serde_json::from_str(&content)?),
            Some(other) => Err(crate::Error::UnsupportedFormat(format!(
                "form descriptor extension '.{}'",
                other
            ))),
        }
    }
}

/// A field whose conditions have been validated
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub field_type: String,
    pub default: Option<FieldValue>,
    pub hide_if: Option<Condition>,
    pub disable_if: Option<Condition>,
}

impl FormField {
    /// Checkbox-like fields submit flags
    pub fn is_checkbox(&self) -> bool {
        matches!(self.field_type.as_str(), "check" | "checkbox" | "toggle")
    }

    pub fn is_hidden(&self, values: &FieldValues) -> bool {
        self.hide_if
            .as_ref()
            .map(|c| c.evaluate(values))
            .unwrap_or(false)
    }

    /// Hidden fields are implicitly disabled
    pub fn is_disabled(&self, values: &FieldValues) -> bool {
        self.disable_if
            .as_ref()
            .map(|c| c.evaluate(values))
            .unwrap_or(false)
            || self.is_hidden(values)
    }
}

/// Resolved visibility of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub name: String,
    pub hidden: bool,
    pub disabled: bool,
}

/// A validated form
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<FormField>,
}

impl Form {
    /// Validate every condition once and check that referenced fields exist
    pub fn from_descriptor(descriptor: &FormDescriptor) -> Result<Self, ValidationError> {
        let mut fields = Vec::with_capacity(descriptor.fields.len());

        for desc in &descriptor.fields {
            let parse = |raw: &Option<Value>| -> Result<Option<Condition>, ValidationError> {
                raw.as_ref()
                    .map(Condition::parse)
                    .transpose()
                    .map_err(|e| ValidationError::InField {
                        field: desc.name.clone(),
                        source: Box::new(e),
                    })
            };

            fields.push(FormField {
                name: desc.name.clone(),
                field_type: desc.field_type.clone(),
                default: desc.default.as_ref().map(FieldValue::from),
                hide_if: parse(&desc.hide_if)?,
                disable_if: parse(&desc.disable_if)?,
            });
        }

        for field in &fields {
            let referenced = field
                .hide_if
                .iter()
                .chain(field.disable_if.iter())
                .flat_map(|c| c.referenced_fields());
            for name in referenced {
                if !fields.iter().any(|f| f.name == name) {
                    return Err(ValidationError::InField {
                        field: field.name.clone(),
                        source: Box::new(ValidationError::UnknownField(name.to_string())),
                    });
                }
            }
        }

        tracing::debug!("Validated form with {} fields", fields.len());
        Ok(Self { fields })
    }

    /// Load a descriptor file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let descriptor = FormDescriptor::load(path)?;
        Ok(Self::from_descriptor(&descriptor)?)
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Merge submitted data over field defaults.
    ///
    /// Checkbox values are normalized to flags so they compare as `'1'` / `''`.
    pub fn field_values(&self, submitted: &FieldValues) -> FieldValues {
        let mut values = FieldValues::new();
        for field in &self.fields {
            let value = match submitted.get(&field.name) {
                Some(v) if field.is_checkbox() => FieldValue::Flag(v.is_truthy()),
                Some(v) => v.clone(),
                None => match &field.default {
                    Some(d) if field.is_checkbox() => FieldValue::Flag(d.is_truthy()),
                    Some(d) => d.clone(),
                    None if field.is_checkbox() => FieldValue::Flag(false),
                    None => continue,
                },
            };
            values.insert(field.name.clone(), value);
        }
        values
    }

    /// Hidden/disabled state for every field, in declaration order
    pub fn states(&self, values: &FieldValues) -> Vec<FieldState> {
        self.fields
            .iter()
            .map(|f| FieldState {
                name: f.name.clone(),
                hidden: f.is_hidden(values),
                disabled: f.is_disabled(values),
            })
            .collect()
    }
}
