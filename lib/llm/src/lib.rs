//! # ragkit LLM
//!
//! Client for OpenAI-compatible HTTP APIs.
//!
//! - [`EmbeddingProvider`] - text to [`ragkit_core::Vector`], order preserved
//! - [`TextGenerator`] - plain, streamed (SSE) and schema-constrained replies
//! - [`Conversation`] - message history for multi-turn chat
//! - [`helpers`] - one-call wrappers over the two traits
//!
//! ```rust,no_run
//! use ragkit_llm::{ClientConfig, OpenAiClient, helpers};
//!
//! # async fn run() -> ragkit_llm::Result<()> {
//! let client = OpenAiClient::new(ClientConfig::new("sk-..."))?;
//! let reply = helpers::quick_response(&client, "Say hello").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod client;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod helpers;
pub mod sse;

pub use chat::{ChatMessage, Conversation, Role};
pub use client::OpenAiClient;
pub use config::ClientConfig;
pub use embeddings::{embed_chunks, EmbeddingProvider};
pub use error::{Error, Result};
pub use generation::TextGenerator;
pub use helpers::{
    create_embeddings, quick_response, stream_chat_response, stream_response, structured_response,
};
pub use tokio_util::sync::CancellationToken;
