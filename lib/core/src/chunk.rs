use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Free-form chunk metadata, ordered by key
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A scalar metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Integer(i) => write!(f, "{}", i),
            MetadataValue::Float(x) => write!(f, "{}", x),
            MetadataValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        MetadataValue::Integer(i)
    }
}

impl From<f64> for MetadataValue {
    fn from(x: f64) -> Self {
        MetadataValue::Float(x)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkId {
    Integer(u64),
    Uuid(Uuid),
    String(String),
}

impl ChunkId {
    /// A fresh random id
    pub fn random() -> Self {
        ChunkId::Uuid(Uuid::new_v4())
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkId::String(s) => write!(f, "{}", s),
            ChunkId::Uuid(u) => write!(f, "{}", u),
            ChunkId::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for ChunkId {
    fn from(s: String) -> Self {
        ChunkId::String(s)
    }
}

impl From<&str> for ChunkId {
    fn from(s: &str) -> Self {
        ChunkId::String(s.to_string())
    }
}

impl From<u64> for ChunkId {
    fn from(i: u64) -> Self {
        ChunkId::Integer(i)
    }
}

impl From<Uuid> for ChunkId {
    fn from(u: Uuid) -> Self {
        ChunkId::Uuid(u)
    }
}

/// A piece of corpus text, optionally carrying its embedding and metadata.
///
/// Chunks are built once at ingestion; the embedding is attached by
/// consuming the chunk with [`DocumentChunk::with_embedding`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    id: ChunkId,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    embedding: Option<Vector>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: Metadata,
}

impl DocumentChunk {
    /// Create a chunk with a random id and no embedding
    #[inline]
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(ChunkId::random(), content)
    }

    #[inline]
    #[must_use]
    pub fn with_id(id: impl Into<ChunkId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            embedding: None,
            metadata: Metadata::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn id(&self) -> &ChunkId {
        &self.id
    }

    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[inline]
    pub fn embedding(&self) -> Option<&Vector> {
        self.embedding.as_ref()
    }

    #[inline]
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    #[inline]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[inline]
    pub fn meta(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }
}
