// Metadata filters applied before scoring
use crate::chunk::{DocumentChunk, MetadataValue};

pub trait Filter {
    fn matches(&self, chunk: &DocumentChunk) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&DocumentChunk) -> bool,
{
    fn matches(&self, chunk: &DocumentChunk) -> bool {
        self(chunk)
    }
}

pub struct MetadataFilter {
    condition: FilterCondition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    Equals { key: String, value: MetadataValue },
    NotEquals { key: String, value: MetadataValue },
    Contains { key: String, value: String },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
    Not(Box<FilterCondition>),
}

impl FilterCondition {
    pub fn equals(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        FilterCondition::Equals {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        FilterCondition::NotEquals {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn contains(key: impl Into<String>, value: impl Into<String>) -> Self {
        FilterCondition::Contains {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl MetadataFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    fn matches_condition(condition: &FilterCondition, chunk: &DocumentChunk) -> bool {
        match condition {
            FilterCondition::Equals { key, value } => {
                chunk.meta(key).map(|v| v == value).unwrap_or(false)
            }
            FilterCondition::NotEquals { key, value } => {
                chunk.meta(key).map(|v| v != value).unwrap_or(true)
            }
            FilterCondition::Contains { key, value } => chunk
                .meta(key)
                .and_then(MetadataValue::as_str)
                .map(|s| s.contains(value.as_str()))
                .unwrap_or(false),
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, chunk))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, chunk))
            }
            FilterCondition::Not(condition) => !Self::matches_condition(condition, chunk),
        }
    }
}

impl Filter for MetadataFilter {
    fn matches(&self, chunk: &DocumentChunk) -> bool {
        Self::matches_condition(&self.condition, chunk)
    }
}

impl From<FilterCondition> for MetadataFilter {
    fn from(condition: FilterCondition) -> Self {
        Self::new(condition)
    }
}
