//! Exact top-k retrieval over an in-memory candidate set.
//!
//! Every embedded candidate is scored against the query with cosine
//! similarity and the best `limit` are returned, highest first. Candidates
//! without an embedding are skipped. Equal scores keep their input order.

use crate::chunk::DocumentChunk;
use crate::filter::Filter;
use crate::vector::Vector;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A chunk paired with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}

impl ScoredResult {
    /// Score as a percentage, e.g. `99.4`
    pub fn percent(&self) -> f32 {
        self.score * 100.0
    }
}

/// Cosine similarity between two vectors of equal dimension
#[inline]
pub fn similarity(a: &Vector, b: &Vector) -> Result<f32> {
    a.cosine_similarity(b)
}

/// Rank `candidates` by similarity to `query` and keep the best `limit`
pub fn search(
    query: &Vector,
    candidates: &[DocumentChunk],
    limit: usize,
) -> Result<Vec<ScoredResult>> {
    rank(query, candidates.iter(), limit)
}

/// Like [`search`], scoring only the candidates accepted by `filter`
pub fn search_filtered(
    query: &Vector,
    candidates: &[DocumentChunk],
    limit: usize,
    filter: &dyn Filter,
) -> Result<Vec<ScoredResult>> {
    rank(
        query,
        candidates.iter().filter(|chunk| filter.matches(chunk)),
        limit,
    )
}

fn rank<'a>(
    query: &Vector,
    candidates: impl Iterator<Item = &'a DocumentChunk>,
    limit: usize,
) -> Result<Vec<ScoredResult>> {
    if limit == 0 {
        return Err(Error::InvalidArgument(
            "search limit must be at least 1".to_string(),
        ));
    }

    let mut scored = Vec::new();
    for chunk in candidates {
        let Some(embedding) = chunk.embedding() else {
            continue;
        };
        let score = similarity(query, embedding)?;
        scored.push((chunk, score));
    }

    // sort_by is stable, so ties stay in input order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);

    Ok(scored
        .into_iter()
        .map(|(chunk, score)| ScoredResult {
            chunk: chunk.clone(),
            score,
        })
        .collect())
}
