//! Text generation through the chat completions endpoint

use crate::chat::ChatMessage;
use crate::client::OpenAiClient;
use crate::sse::{SseDecoder, SseEvent};
use crate::{Error, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use ragkit_schema::OutputSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// A model that turns a message history into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Single non-streamed reply
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Streamed reply. Each fragment is handed to `sink` as it arrives;
    /// the concatenation of all fragments is returned.
    async fn stream(
        &self,
        messages: &[ChatMessage],
        sink: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String>;

    /// Reply constrained to `schema`, parsed as JSON but not yet validated
    async fn complete_json(&self, messages: &[ChatMessage], schema: &OutputSchema) -> Result<Value>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl OpenAiClient {
    async fn chat(&self, messages: &[ChatMessage], response_format: Option<Value>) -> Result<ReplyMessage> {
        let request = ChatRequest {
            model: &self.config().chat_model,
            messages,
            stream: false,
            response_format,
        };
        let response: ChatResponse = self.post_json("chat/completions", &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| Error::provider("response contained no choices"))
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let reply = self.chat(messages, None).await?;
        match reply.content {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(Error::provider("model returned an empty reply")),
        }
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        sink: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String> {
        let request = ChatRequest {
            model: &self.config().chat_model,
            messages,
            stream: true,
            response_format: None,
        };
        let response = self.post("chat/completions", &request, None).await?;

        let idle = self.config().timeout;
        let mut body = Box::pin(response.bytes_stream());
        let mut decoder = SseDecoder::new();
        let mut full = String::new();

        loop {
            let next = self
                .guard(async {
                    tokio::time::timeout(idle, body.next())
                        .await
                        .map_err(|_| Error::Timeout(idle))
                })
                .await?;

            let (events, finished) = match next {
                Some(chunk) => (decoder.push(&chunk.map_err(|e| self.transport(e))?), false),
                None => (decoder.finish(), true),
            };

            for event in events {
                match event {
                    SseEvent::Done => return Ok(full),
                    SseEvent::Data(payload) => {
                        if let Some(fragment) = parse_fragment(&payload)? {
                            sink(&fragment);
                            full.push_str(&fragment);
                        }
                    }
                }
            }

            if finished {
                debug!("stream ended without [DONE] marker");
                return Ok(full);
            }
        }
    }

    async fn complete_json(&self, messages: &[ChatMessage], schema: &OutputSchema) -> Result<Value> {
        schema.validate_definition()?;
        let reply = self.chat(messages, Some(schema.response_format())).await?;

        if let Some(refusal) = reply.refusal {
            warn!("model refused structured request: {}", refusal);
            return Err(Error::Provider(format!("model refused: {}", refusal)));
        }
        let content = reply
            .content
            .ok_or_else(|| Error::provider("model returned an empty reply"))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Provider(format!("reply is not valid JSON: {}", e)))
    }
}

/// Content fragment of one stream event, if it carries any text
fn parse_fragment(payload: &str) -> Result<Option<String>> {
    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|e| Error::Provider(format!("malformed stream event: {}", e)))?;

    if let Some(error) = chunk.error {
        return Err(Error::Provider(error.message));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}
