//! Server-Sent Events line decoder
//!
//! Network chunks do not respect line boundaries, so bytes are buffered
//! until a full line is available. Only `data:` fields are surfaced;
//! comments and other fields are skipped.

use bytes::BytesMut;

const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Payload of one `data:` line
    Data(String),
    /// The `data: [DONE]` terminator
    Done,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: BytesMut,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a network chunk and return the events completed by it
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.split_to(pos + 1);
            if let Some(event) = parse_line(&line[..pos]) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing line that was not newline-terminated
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let rest = self.buffer.split();
        parse_line(&rest).into_iter().collect()
    }
}

fn parse_line(line: &[u8]) -> Option<SseEvent> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let text = String::from_utf8_lossy(line);
    let data = text.strip_prefix("data:")?.trim();

    match data {
        "" => None,
        DONE_MARKER => Some(SseEvent::Done),
        payload => Some(SseEvent::Data(payload.to_string())),
    }
}
