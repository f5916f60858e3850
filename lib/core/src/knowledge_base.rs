use crate::search::{self, ScoredResult};
use crate::{ChunkId, DocumentChunk, Error, Filter, Result, Vector};
use parking_lot::RwLock;

/// Configuration for a knowledge base
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseConfig {
    pub name: String,
    /// Fixed embedding dimension. When `None` the first embedded chunk sets it.
    pub dimension: Option<usize>,
}

impl KnowledgeBaseConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimension: None,
        }
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }
}

/// An in-memory set of document chunks, kept in insertion order
pub struct KnowledgeBase {
    name: String,
    dimension: RwLock<Option<usize>>,
    chunks: RwLock<Vec<DocumentChunk>>,
}

impl KnowledgeBase {
    pub fn new(config: KnowledgeBaseConfig) -> Self {
        Self {
            name: config.name,
            dimension: RwLock::new(config.dimension),
            chunks: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> Option<usize> {
        *self.dimension.read()
    }

    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    /// Number of chunks that can take part in retrieval
    pub fn embedded_count(&self) -> usize {
        self.chunks.read().iter().filter(|c| c.has_embedding()).count()
    }

    /// Add a chunk.
    ///
    /// Chunks without an embedding are kept but never retrieved.
    pub fn insert(&self, chunk: DocumentChunk) -> Result<()> {
        if let Some(embedding) = chunk.embedding() {
            self.check_dimension(embedding)?;
        }
        self.chunks.write().push(chunk);
        Ok(())
    }

    /// Add several chunks; stops at the first one that is rejected
    pub fn insert_many(&self, chunks: impl IntoIterator<Item = DocumentChunk>) -> Result<()> {
        for chunk in chunks {
            self.insert(chunk)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &ChunkId) -> Option<DocumentChunk> {
        self.chunks.read().iter().find(|c| c.id() == id).cloned()
    }

    /// Snapshot of every chunk in insertion order
    pub fn chunks(&self) -> Vec<DocumentChunk> {
        self.chunks.read().clone()
    }

    /// Chunks whose metadata satisfies `filter`
    pub fn by_metadata(&self, filter: &dyn Filter) -> Vec<DocumentChunk> {
        self.chunks
            .read()
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect()
    }

    /// Top-`limit` chunks by cosine similarity to `query`
    pub fn search(&self, query: &Vector, limit: usize) -> Result<Vec<ScoredResult>> {
        self.check_query(query)?;
        let chunks = self.chunks.read();
        search::search(query, &chunks, limit)
    }

    /// Like [`KnowledgeBase::search`], restricted to chunks matching `filter`
    pub fn search_filtered(
        &self,
        query: &Vector,
        limit: usize,
        filter: &dyn Filter,
    ) -> Result<Vec<ScoredResult>> {
        self.check_query(query)?;
        let chunks = self.chunks.read();
        search::search_filtered(query, &chunks, limit, filter)
    }

    fn check_dimension(&self, embedding: &Vector) -> Result<()> {
        let mut dimension = self.dimension.write();
        match *dimension {
            Some(expected) if expected != embedding.dim() => Err(Error::InvalidDimension {
                expected,
                actual: embedding.dim(),
            }),
            Some(_) => Ok(()),
            None if embedding.is_empty() => Err(Error::InvalidArgument(
                "embedding must not be empty".to_string(),
            )),
            None => {
                *dimension = Some(embedding.dim());
                Ok(())
            }
        }
    }

    fn check_query(&self, query: &Vector) -> Result<()> {
        match self.dimension() {
            Some(expected) if expected != query.dim() => Err(Error::InvalidDimension {
                expected,
                actual: query.dim(),
            }),
            _ => Ok(()),
        }
    }
}
