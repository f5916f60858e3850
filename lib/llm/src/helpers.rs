//! One-call helpers used by the lessons

use crate::chat::{ChatMessage, Conversation};
use crate::embeddings::EmbeddingProvider;
use crate::generation::TextGenerator;
use crate::Result;
use ragkit_core::Vector;
use ragkit_schema::OutputSchema;
use serde::de::DeserializeOwned;
use std::io::Write;

/// Stream a reply to a single user prompt into `out`, followed by a blank line
pub async fn stream_response<G>(generator: &G, prompt: &str, out: &mut (dyn Write + Send)) -> Result<String>
where
    G: TextGenerator + ?Sized,
{
    stream_messages(generator, &[ChatMessage::user(prompt)], out).await
}

/// Non-streamed reply to a single user prompt
pub async fn quick_response<G>(generator: &G, prompt: &str) -> Result<String>
where
    G: TextGenerator + ?Sized,
{
    generator.complete(&[ChatMessage::user(prompt)]).await
}

/// Stream the next assistant turn for `conversation` into `out`.
///
/// The reply is returned, not appended; callers decide what to remember.
pub async fn stream_chat_response<G>(
    generator: &G,
    conversation: &Conversation,
    out: &mut (dyn Write + Send),
) -> Result<String>
where
    G: TextGenerator + ?Sized,
{
    stream_messages(generator, conversation.messages(), out).await
}

/// Ask for a reply shaped by `schema`, validate it, then decode it into `T`
pub async fn structured_response<T, G>(generator: &G, prompt: &str, schema: &OutputSchema) -> Result<T>
where
    T: DeserializeOwned,
    G: TextGenerator + ?Sized,
{
    let mut value = generator
        .complete_json(&[ChatMessage::user(prompt)], schema)
        .await?;
    schema.normalize(&mut value);
    schema.validate(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// One embedding per text, in input order
pub async fn create_embeddings<P, S>(provider: &P, texts: &[S]) -> Result<Vec<Vector>>
where
    P: EmbeddingProvider + ?Sized,
    S: AsRef<str>,
{
    let texts: Vec<String> = texts.iter().map(|t| t.as_ref().to_string()).collect();
    provider.embed(&texts).await
}

async fn stream_messages<G>(
    generator: &G,
    messages: &[ChatMessage],
    out: &mut (dyn Write + Send),
) -> Result<String>
where
    G: TextGenerator + ?Sized,
{
    let mut write_error = None;
    let full = {
        let mut sink = |fragment: &str| {
            if write_error.is_none() {
                if let Err(e) = out.write_all(fragment.as_bytes()).and_then(|_| out.flush()) {
                    write_error = Some(e);
                }
            }
        };
        generator.stream(messages, &mut sink).await?
    };

    if let Some(e) = write_error {
        return Err(e.into());
    }
    writeln!(out)?;
    writeln!(out)?;
    Ok(full)
}
