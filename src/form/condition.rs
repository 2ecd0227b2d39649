//! @acp:module "Form Condition Evaluator"
//! @acp:summary "Parse, validate and evaluate hide-if/disable-if condition trees"
//! @acp:domain forms
//! @acp:layer logic
//!
//! Conditions arrive as nested JSON arrays whose first element is the
//! operator tag:
//!
//! ```json
//! ["OR", ["===", "mode", "advanced"], ["NOT", ["===", "enabled", "1"]]]
//! ```
//!
//! They are parsed once into [`Condition`] and every structural problem is
//! reported then, so evaluation itself cannot fail.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::values::FieldValues;

/// Structural problems found while parsing a condition tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("expected array, found {0}")]
    ExpectedArray(&'static str),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("{op} takes exactly {expected}, found {found}")]
    WrongArity {
        op: String,
        expected: &'static str,
        found: usize,
    },

    #[error("{0} requires at least one parameter")]
    MissingOperands(String),

    #[error("parameters for {0} must be strings")]
    NonStringParameter(String),

    #[error("condition references unknown field '{0}'")]
    UnknownField(String),

    #[error("field '{field}': {source}")]
    InField {
        field: String,
        #[source]
        source: Box<ValidationError>,
    },
}

/// Leaf comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equals,
    NotEquals,
}

impl ComparisonOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Equals => "===",
            ComparisonOp::NotEquals => "!==",
        }
    }
}

/// N-ary logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Nand,
    Nor,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Nand => "NAND",
            LogicalOp::Nor => "NOR",
        }
    }
}

/// A validated condition tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Condition {
    /// `["===", field, literal]` or `["!==", field, literal]`
    Comparison {
        op: ComparisonOp,
        field: String,
        value: String,
    },
    /// `["NOT", condition]`
    Not(Box<Condition>),
    /// `["AND" | "OR" | "NAND" | "NOR", condition, ...]`
    Logical {
        op: LogicalOp,
        operands: Vec<Condition>,
    },
}

impl Condition {
    /// Parse and validate a condition tree from its JSON array form
    pub fn parse(value: &Value) -> Result<Self, ValidationError> {
        let items = value
            .as_array()
            .ok_or_else(|| ValidationError::ExpectedArray(json_type_name(value)))?;

        let (op, params) = match items.split_first() {
            Some((Value::String(op), params)) => (op.as_str(), params),
            Some((other, _)) => return Err(ValidationError::UnknownOperation(other.to_string())),
            None => return Err(ValidationError::UnknownOperation("(empty)".to_string())),
        };

        match op {
            "===" | "!==" => {
                if params.len() != 2 {
                    return Err(ValidationError::WrongArity {
                        op: op.to_string(),
                        expected: "two parameters",
                        found: params.len(),
                    });
                }
                let (Value::String(field), Value::String(literal)) = (&params[0], &params[1])
                else {
                    return Err(ValidationError::NonStringParameter(op.to_string()));
                };
                Ok(Condition::Comparison {
                    op: if op == "===" {
                        ComparisonOp::Equals
                    } else {
                        ComparisonOp::NotEquals
                    },
                    field: field.clone(),
                    value: literal.clone(),
                })
            }
            "NOT" => {
                if params.len() != 1 {
                    return Err(ValidationError::WrongArity {
                        op: op.to_string(),
                        expected: "one parameter",
                        found: params.len(),
                    });
                }
                Ok(Condition::Not(Box::new(Condition::parse(&params[0])?)))
            }
            "AND" | "OR" | "NAND" | "NOR" => {
                if params.is_empty() {
                    return Err(ValidationError::MissingOperands(op.to_string()));
                }
                let operands = params
                    .iter()
                    .map(Condition::parse)
                    .collect::<Result<Vec<_>, _>>()?;
                let op = match op {
                    "AND" => LogicalOp::And,
                    "OR" => LogicalOp::Or,
                    "NAND" => LogicalOp::Nand,
                    _ => LogicalOp::Nor,
                };
                Ok(Condition::Logical { op, operands })
            }
            other => Err(ValidationError::UnknownOperation(other.to_string())),
        }
    }

    /// Evaluate against the submitted field values
    pub fn evaluate(&self, values: &FieldValues) -> bool {
        match self {
            Condition::Comparison { op, field, value } => {
                let matches = values.text(field) == value.as_str();
                match op {
                    ComparisonOp::Equals => matches,
                    ComparisonOp::NotEquals => !matches,
                }
            }
            Condition::Not(inner) => !inner.evaluate(values),
            Condition::Logical { op, operands } => match op {
                LogicalOp::And => operands.iter().all(|c| c.evaluate(values)),
                LogicalOp::Or => operands.iter().any(|c| c.evaluate(values)),
                LogicalOp::Nand => !operands.iter().all(|c| c.evaluate(values)),
                LogicalOp::Nor => !operands.iter().any(|c| c.evaluate(values)),
            },
        }
    }

    /// Names of every field the tree compares against, in tree order
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::Comparison { field, .. } => {
                if !out.contains(&field.as_str()) {
                    out.push(field);
                }
            }
            Condition::Not(inner) => inner.collect_fields(out),
            Condition::Logical { operands, .. } => {
                for operand in operands {
                    operand.collect_fields(out);
                }
            }
        }
    }

    /// Serialize back to the array form consumed by client-side scripts
    pub fn to_client_json(&self) -> Value {
        match self {
            Condition::Comparison { op, field, value } => Value::Array(vec![
                Value::from(op.as_str()),
                Value::from(field.as_str()),
                Value::from(value.as_str()),
            ]),
            Condition::Not(inner) => Value::Array(vec![Value::from("NOT"), inner.to_client_json()]),
            Condition::Logical { op, operands } => {
                let mut items = Vec::with_capacity(operands.len() + 1);
                items.push(Value::from(op.as_str()));
                items.extend(operands.iter().map(Condition::to_client_json));
                Value::Array(items)
            }
        }
    }
}

impl TryFrom<Value> for Condition {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Condition::parse(&value)
    }
}

impl From<Condition> for Value {
    fn from(condition: Condition) -> Self {
        condition.to_client_json()
    }
}

/// Evaluate a condition tree against submitted field values
pub fn evaluate(condition: &Condition, values: &FieldValues) -> bool {
    condition.evaluate(values)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
