//! Lesson 1: stream a first reply from the model

use super::rule;
use ragkit_llm::{stream_response, Result, TextGenerator};
use std::io::Write;

pub const PROMPT: &str = "You are a helpful AI assistant. Introduce yourself and explain what you can do \
in a friendly, engaging way. Keep it under 100 words.";

pub async fn run<G>(generator: &G, out: &mut (dyn Write + Send)) -> Result<String>
where
    G: TextGenerator + ?Sized,
{
    writeln!(out, "🚀 Welcome to your first AI app!")?;
    writeln!(out, "⚡ Streaming the model's response...\n")?;
    writeln!(out, "🤖 AI Response:")?;
    writeln!(out, "{}", rule('─', 50))?;

    let response = stream_response(generator, PROMPT, out).await?;

    writeln!(out, "{}", rule('─', 50))?;
    writeln!(out, "✅ Complete! Generated {} characters", response.chars().count())?;
    writeln!(out, "\n💡 What just happened?")?;
    writeln!(out, "- Connected to the chat completions API")?;
    writeln!(out, "- Streamed the response as it was generated")?;
    writeln!(out, "\n🎯 Next: build a chat app with memory (ragkit chat)")?;
    Ok(response)
}
