//! # ragkit Core
//!
//! Core library for ragkit: the in-memory semantic retrieval engine.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`Vector`] - Dense embedding with SIMD dot product and norm
//! - [`DocumentChunk`] - Text content with optional embedding and metadata
//! - [`similarity`] / [`search`] - Cosine similarity and exact top-k ranking
//! - [`MetadataFilter`] - Restrict retrieval by chunk metadata
//! - [`KnowledgeBase`] - Thread-safe container of chunks
//!
//! ## Example
//!
//! ```rust
//! use ragkit_core::{search, DocumentChunk, Vector};
//!
//! let candidates = vec![
//!     DocumentChunk::new("remote work policy").with_embedding(Vector::new(vec![1.0, 0.0])),
//!     DocumentChunk::new("marketing budget").with_embedding(Vector::new(vec![0.0, 1.0])),
//!     DocumentChunk::new("not embedded yet"),
//! ];
//!
//! let query = Vector::new(vec![0.9, 0.1]);
//! let results = search(&query, &candidates, 1).unwrap();
//! assert_eq!(results[0].chunk.content(), "remote work policy");
//! ```

pub mod chunk;
pub mod error;
pub mod filter;
pub mod knowledge_base;
pub mod search;
pub mod vector;

/// SIMD dot product and norm kernels
///
/// - AVX2/FMA on x86_64
/// - NEON on ARM64/Apple Silicon
/// - Scalar fallback elsewhere
pub mod simd;

pub use chunk::{ChunkId, DocumentChunk, Metadata, MetadataValue};
pub use error::{Error, Result};
pub use filter::{Filter, FilterCondition, MetadataFilter};
pub use knowledge_base::{KnowledgeBase, KnowledgeBaseConfig};
pub use search::{search, search_filtered, similarity, ScoredResult};
pub use vector::Vector;
