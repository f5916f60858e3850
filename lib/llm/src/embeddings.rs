//! Embedding generation

use crate::client::OpenAiClient;
use crate::{Error, Result};
use async_trait::async_trait;
use ragkit_core::{DocumentChunk, Vector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Turns texts into vectors, one per text, in input order
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>>;

    /// Embed a single text
    async fn embed_one(&self, text: &str) -> Result<Vector> {
        self.embed(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| Error::provider("no embedding returned"))
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'static str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.config().embedding_model,
            input: texts,
            encoding_format: "float",
        };
        let response: EmbeddingResponse = self.post_json("embeddings", &request).await?;
        let vectors = order_embeddings(response.data, texts.len())?;

        debug!(
            "embedded {} texts with {} ({} dimensions)",
            vectors.len(),
            self.config().embedding_model,
            vectors[0].dim()
        );
        Ok(vectors)
    }
}

/// Put embeddings back in request order and check their shape
fn order_embeddings(mut data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vector>> {
    if data.len() != expected {
        return Err(Error::Provider(format!(
            "response data count mismatch: expected {}, got {}",
            expected,
            data.len()
        )));
    }

    data.sort_by_key(|item| item.index);
    let mut dimension = None;
    let mut vectors = Vec::with_capacity(expected);

    for (position, item) in data.into_iter().enumerate() {
        if item.index != position {
            return Err(Error::Provider(format!(
                "missing embedding for input {}",
                position
            )));
        }
        if item.embedding.is_empty() {
            return Err(Error::Provider(format!("empty embedding for input {}", position)));
        }
        match dimension {
            None => dimension = Some(item.embedding.len()),
            Some(d) if d != item.embedding.len() => {
                return Err(Error::Provider(format!(
                    "inconsistent embedding dimensions: {} and {}",
                    d,
                    item.embedding.len()
                )))
            }
            Some(_) => {}
        }
        vectors.push(Vector::new(item.embedding));
    }
    Ok(vectors)
}

/// Embed the content of each chunk and attach the result
pub async fn embed_chunks<P>(provider: &P, chunks: Vec<DocumentChunk>) -> Result<Vec<DocumentChunk>>
where
    P: EmbeddingProvider + ?Sized,
{
    let texts: Vec<String> = chunks.iter().map(|c| c.content().to_string()).collect();
    let vectors = provider.embed(&texts).await?;
    if vectors.len() != chunks.len() {
        return Err(Error::Provider(format!(
            "expected {} embeddings, got {}",
            chunks.len(),
            vectors.len()
        )));
    }

    Ok(chunks
        .into_iter()
        .zip(vectors)
        .map(|(chunk, vector)| chunk.with_embedding(vector))
        .collect())
}
