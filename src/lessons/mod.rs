//! The four lessons, each runnable as a `ragkit` subcommand.
//!
//! Lessons write to any [`std::io::Write`] and talk to the model only
//! through the [`TextGenerator`](ragkit_llm::TextGenerator) and
//! [`EmbeddingProvider`](ragkit_llm::EmbeddingProvider) traits.

pub mod chat;
pub mod first_app;
pub mod rag;
pub mod smart_json;

/// A horizontal rule of `width` copies of `ch`
pub fn rule(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

/// First `max_chars` characters of `text`, with `...` appended when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
