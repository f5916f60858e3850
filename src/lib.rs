//! # ragkit
//!
//! Hands-on lessons for building with large language models, plus the
//! in-memory semantic search engine the retrieval lesson runs on.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! ragkit first-app
//! ragkit chat
//! ragkit smart-json
//! ragkit rag
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use ragkit::prelude::*;
//!
//! let kb = KnowledgeBase::new(KnowledgeBaseConfig::new("handbook"));
//! kb.insert(
//!     DocumentChunk::new("VPN access is mandatory for remote work.")
//!         .with_meta("category", "IT")
//!         .with_embedding(Vector::new(vec![0.1, 0.9])),
//! )
//! .unwrap();
//!
//! let results = kb.search(&Vector::new(vec![0.2, 0.8]), 3).unwrap();
//! assert_eq!(results.len(), 1);
//! ```
//!
//! ## Crate Structure
//!
//! - [`ragkit-core`](https://docs.rs/ragkit-core) - Vectors, chunks, cosine ranking, knowledge base
//! - [`ragkit-schema`](https://docs.rs/ragkit-schema) - Output schemas, JSON Schema export, validation
//! - [`ragkit-llm`](https://docs.rs/ragkit-llm) - Embeddings, streamed chat and structured output

pub mod config;
pub mod lessons;

// Re-export core types
pub use ragkit_core::{
    search, search_filtered, similarity, ChunkId, DocumentChunk, Filter, FilterCondition,
    KnowledgeBase, KnowledgeBaseConfig, Metadata, MetadataFilter, MetadataValue, ScoredResult,
    Vector,
};

// Re-export schema types
pub use ragkit_schema::{Field, FieldKind, OutputSchema};

// Re-export client
pub use ragkit_llm::{
    ChatMessage, ClientConfig, Conversation, EmbeddingProvider, OpenAiClient, TextGenerator,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        search, search_filtered, similarity, ChatMessage, ClientConfig, Conversation,
        DocumentChunk, EmbeddingProvider, Field, FieldKind, FilterCondition, KnowledgeBase,
        KnowledgeBaseConfig, MetadataFilter, OpenAiClient, OutputSchema, ScoredResult,
        TextGenerator, Vector,
    };
}
