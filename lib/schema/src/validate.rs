//! Validation of model replies against an [`OutputSchema`]
//!
//! The schema is exported with [`OutputSchema::to_json_schema`] and checked
//! by the `jsonschema` validator. Every error is reported with the JSON
//! path of the offending value (`$.action_items[1]`).

use crate::schema::{Field, FieldKind, OutputSchema};
use jsonschema::error::ValidationErrorKind;
use serde_json::{Number, Value};
use std::fmt;

/// One failed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// All violations found in a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_violations(.violations))]
pub struct ValidationErrors {
    pub violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Paths of the failing values, in the order the validator reported them
    pub fn paths(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.path.as_str()).collect()
    }
}

fn join_violations(violations: &[Violation]) -> String {
    let parts: Vec<String> = violations.iter().map(ToString::to_string).collect();
    parts.join("; ")
}

impl OutputSchema {
    /// Check `value` against this schema
    pub fn validate(&self, value: &Value) -> Result<(), ValidationErrors> {
        let validator = jsonschema::validator_for(&self.to_json_schema()).map_err(|e| {
            ValidationErrors {
                violations: vec![Violation {
                    path: "$".to_string(),
                    message: format!("schema does not compile: {}", e),
                }],
            }
        })?;

        let mut violations = Vec::new();
        for error in validator.iter_errors(value) {
            let parent = json_path(&error.instance_path.to_string(), value);
            match &error.kind {
                ValidationErrorKind::Required { property } => violations.push(Violation {
                    path: child_path(&parent, property.as_str().unwrap_or_default()),
                    message: "missing required field".to_string(),
                }),
                ValidationErrorKind::AdditionalProperties { unexpected } => {
                    for key in unexpected {
                        violations.push(Violation {
                            path: child_path(&parent, key),
                            message: "unexpected field".to_string(),
                        });
                    }
                }
                _ => violations.push(Violation {
                    path: parent,
                    message: error.to_string(),
                }),
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { violations })
        }
    }

    /// Rewrite whole floats such as `4.0` to integers where the schema
    /// declares an `integer`, so the value decodes into integer types.
    pub fn normalize(&self, value: &mut Value) {
        if let Value::Object(map) = value {
            normalize_fields(&self.fields, map);
        }
    }
}

fn normalize_fields(fields: &[Field], map: &mut serde_json::Map<String, Value>) {
    for field in fields {
        if let Some(value) = map.get_mut(&field.name) {
            normalize_kind(&field.kind, value);
        }
    }
}

fn normalize_kind(kind: &FieldKind, value: &mut Value) {
    match (kind, value) {
        (FieldKind::Integer, Value::Number(n)) if n.is_f64() => {
            if let Some(x) = n.as_f64() {
                if x.fract() == 0.0 && x >= i64::MIN as f64 && x <= i64::MAX as f64 {
                    *n = Number::from(x as i64);
                }
            }
        }
        (FieldKind::Array { items }, Value::Array(elements)) => {
            for element in elements {
                normalize_kind(items, element);
            }
        }
        (FieldKind::Object { fields }, Value::Object(map)) => normalize_fields(fields, map),
        _ => {}
    }
}

/// Convert a JSON pointer (`/action_items/1`) into `$.action_items[1]`,
/// using `instance` to tell array indices from object keys
fn json_path(pointer: &str, instance: &Value) -> String {
    let mut path = String::from("$");
    let mut current = Some(instance);

    for raw in pointer.split('/').skip(1) {
        let segment = raw.replace("~1", "/").replace("~0", "~");
        match current {
            Some(Value::Array(items)) => {
                path.push_str(&format!("[{}]", segment));
                current = segment.parse::<usize>().ok().and_then(|i| items.get(i));
            }
            Some(Value::Object(map)) => {
                path = child_path(&path, &segment);
                current = map.get(&segment);
            }
            _ => {
                path = child_path(&path, &segment);
                current = None;
            }
        }
    }
    path
}

fn child_path(parent: &str, key: &str) -> String {
    format!("{}.{}", parent, key)
}
