//! Lesson 2: terminal chat that remembers the conversation

use ragkit_llm::{stream_chat_response, Conversation, Error, Result, TextGenerator};
use std::io::{BufRead, Write};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Be conversational, friendly, \
and remember what the user tells you throughout our chat.";

/// `exit` or `quit`, in any case, ends the chat
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Lines typed by the user; the channel closing means end of input
pub type InputLines = mpsc::Receiver<std::io::Result<String>>;

/// Read stdin on its own thread.
///
/// The thread is detached, so a blocked read never keeps the process
/// alive once the chat returns.
pub fn stdin_lines() -> InputLines {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Read user turns from `input` until an exit command or end of input.
///
/// Returns the final conversation.
pub async fn run<G>(
    generator: &G,
    mut input: InputLines,
    out: &mut (dyn Write + Send),
    cancel: &CancellationToken,
) -> Result<Conversation>
where
    G: TextGenerator + ?Sized,
{
    let mut conversation = Conversation::new(SYSTEM_PROMPT);

    writeln!(out, "🤖 Terminal chat")?;
    writeln!(out, "💭 I'll remember our conversation.")?;
    writeln!(out, "💡 Type 'exit' or 'quit' to end the chat\n")?;

    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            line = input.recv() => line.transpose()?,
        };

        let Some(line) = line else {
            debug!("input closed");
            writeln!(out)?;
            break;
        };
        if is_exit_command(&line) {
            writeln!(out, "\n🤖 Thanks for chatting! Goodbye! 👋")?;
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        conversation.push_user(line.trim());
        writeln!(out, "\n🤖 AI: ")?;
        let reply = stream_chat_response(generator, &conversation, out).await?;
        conversation.push_assistant(reply);

        writeln!(out, "💾 Memory: {} messages stored\n", conversation.stored_count())?;
    }

    Ok(conversation)
}
