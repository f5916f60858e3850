//! Output schema definitions
//!
//! Declares the shape of a structured model reply. A schema is a named
//! list of fields; each field has a kind, an optional description and a
//! required flag. Kinds nest through arrays and objects.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Declarative description of a structured reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSchema {
    /// Name sent with the request, e.g. `customer_feedback_analysis`
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Top-level fields, in declaration order
    pub fields: Vec<Field>,
}

impl OutputSchema {
    /// Create an empty schema with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a field
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Get a top-level field by name
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check the definition itself: name, field names and enum values
    pub fn validate_definition(&self) -> Result<(), SchemaError> {
        if !is_valid_name(&self.name) {
            return Err(SchemaError::InvalidName(self.name.clone()));
        }
        if self.fields.is_empty() {
            return Err(SchemaError::EmptySchema);
        }
        check_fields(&self.fields, "$")
    }
}

// Schema names may only use [A-Za-z0-9_-], at most 64 characters
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn check_fields(fields: &[Field], path: &str) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for field in fields {
        let field_path = format!("{}.{}", path, field.name);
        if field.name.is_empty() {
            return Err(SchemaError::InvalidName(field_path));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField(field_path));
        }
        check_kind(&field.kind, &field_path)?;
    }
    Ok(())
}

fn check_kind(kind: &FieldKind, path: &str) -> Result<(), SchemaError> {
    match kind {
        FieldKind::Enum { values } => {
            if values.is_empty() {
                return Err(SchemaError::EmptyEnum(path.to_string()));
            }
            let mut seen = HashSet::new();
            for value in values {
                if !seen.insert(value.as_str()) {
                    return Err(SchemaError::DuplicateEnumValue {
                        path: path.to_string(),
                        value: value.clone(),
                    });
                }
            }
            Ok(())
        }
        FieldKind::Array { items } => check_kind(items, &format!("{}[]", path)),
        FieldKind::Object { fields } => {
            if fields.is_empty() {
                return Err(SchemaError::EmptyObject(path.to_string()));
            }
            check_fields(fields, path)
        }
        FieldKind::String | FieldKind::Number | FieldKind::Integer | FieldKind::Boolean => Ok(()),
    }
}

/// A single named field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub name: String,

    #[serde(flatten)]
    pub kind: FieldKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional fields may be `null` in the reply
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            required: true,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldKind::enumeration(values))
    }

    pub fn array(name: impl Into<String>, items: FieldKind) -> Self {
        Self::new(
            name,
            FieldKind::Array {
                items: Box::new(items),
            },
        )
    }

    pub fn object(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, FieldKind::Object { fields })
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Field kinds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text
    String,
    /// One of a fixed set of strings
    Enum { values: Vec<String> },
    /// Any JSON number
    Number,
    /// A number without a fractional part
    Integer,
    Boolean,
    /// Homogeneous list
    Array { items: Box<FieldKind> },
    /// Nested record
    Object { fields: Vec<Field> },
}

impl FieldKind {
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Human-readable kind name used in validation messages
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Array { .. } => "array",
            FieldKind::Object { .. } => "object",
        }
    }
}

/// Errors in a schema definition
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema must declare at least one field")]
    EmptySchema,

    #[error("Invalid name '{0}'")]
    InvalidName(String),

    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("Enum at '{0}' has no values")]
    EmptyEnum(String),

    #[error("Enum at '{path}' repeats value '{value}'")]
    DuplicateEnumValue { path: String, value: String },

    #[error("Object at '{0}' has no fields")]
    EmptyObject(String),
}
