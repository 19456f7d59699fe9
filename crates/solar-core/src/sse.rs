//! # SSE Module
//!
//! Incremental decoder for the server-sent-event body of a streaming
//! chat-completion response.
//!
//! The body is a sequence of lines of the form `data: <json>` and is
//! terminated by `data: [DONE]`. Bytes arrive in arbitrary pieces; the
//! decoder keeps the trailing partial line between pushes.
//!
//! ## Tolerance
//!
//! - Blank lines, comments and other SSE fields are skipped
//! - A `data:` payload that is not a valid chunk is dropped, the stream goes on
//! - Nothing is produced after `[DONE]`

use crate::types::ChatCompletionChunk;

/// Prefix of an SSE data line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload marking the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Event produced by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A successfully parsed chunk.
    Chunk(ChatCompletionChunk),
    /// The `[DONE]` sentinel was seen.
    Done,
}

/// Line-buffered SSE decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    finished: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` sentinel has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of bytes held back waiting for a line feed.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a piece of the body and return the events of every line it completes.
    ///
    /// Lines are split on raw bytes, so a UTF-8 sequence cut between two
    /// pushes is joined back before it is decoded.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        self.buffer.extend_from_slice(bytes);

        let Some(last_newline) = self.buffer.iter().rposition(|&b| b == b'\n') else {
            return events;
        };
        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        for raw in complete.split(|&b| b == b'\n') {
            let line = String::from_utf8_lossy(raw);
            match decode_line(&line) {
                LineOutcome::Skip => {}
                LineOutcome::Chunk(chunk) => events.push(SseEvent::Chunk(*chunk)),
                LineOutcome::Done => {
                    self.finished = true;
                    self.buffer.clear();
                    events.push(SseEvent::Done);
                    break;
                }
            }
        }

        events
    }
}

enum LineOutcome {
    Skip,
    Chunk(Box<ChatCompletionChunk>),
    Done,
}

/// Classify a single complete line.
fn decode_line(line: &str) -> LineOutcome {
    let trimmed = line.trim();
    let Some(payload) = trimmed.strip_prefix(DATA_PREFIX) else {
        return LineOutcome::Skip;
    };
    if payload == DONE_SENTINEL {
        return LineOutcome::Done;
    }
    match serde_json::from_str::<ChatCompletionChunk>(payload) {
        Ok(chunk) => LineOutcome::Chunk(Box::new(chunk)),
        Err(_) => LineOutcome::Skip,
    }
}

// =============================================================================
// TESTS
// =============================================================================
