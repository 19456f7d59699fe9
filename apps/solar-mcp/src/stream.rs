//! # Chunk Stream
//!
//! Adapts a raw response body into a stream of chat-completion chunks.
//!
//! Every read from the body is fed into an [`SseDecoder`]; decoded chunks are
//! handed out one at a time. The body is dropped as soon as the `[DONE]`
//! sentinel, the end of data, or a read error is seen.

use crate::client::ClientError;
use futures::stream::{self, Stream, StreamExt};
use solar_core::{ChatCompletionChunk, SseDecoder, SseEvent};
use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

/// Lazy, finite sequence of chunks from one streaming response.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, ClientError>> + Send>>;

struct DecodeState<S> {
    /// `None` once the body has been released.
    body: Option<S>,
    decoder: SseDecoder,
    ready: VecDeque<ChatCompletionChunk>,
}

/// Decode an SSE body into chunks.
pub fn decode_chunks<S, B, E>(body: S) -> impl Stream<Item = Result<ChatCompletionChunk, ClientError>> + Send
where
    S: Stream<Item = Result<B, E>> + Unpin + Send,
    B: AsRef<[u8]> + Send,
    E: Display + Send,
{
    let state = DecodeState {
        body: Some(body),
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(chunk) = state.ready.pop_front() {
                return Some((Ok(chunk), state));
            }

            let body = state.body.as_mut()?;
            match body.next().await {
                Some(Ok(bytes)) => {
                    for event in state.decoder.push(bytes.as_ref()) {
                        match event {
                            SseEvent::Chunk(chunk) => state.ready.push_back(chunk),
                            SseEvent::Done => {
                                tracing::trace!("stream finished with sentinel");
                                state.body = None;
                            }
                        }
                    }
                }
                Some(Err(e)) => {
                    state.body = None;
                    state.ready.clear();
                    return Some((Err(ClientError::Stream(e.to_string())), state));
                }
                None => {
                    if state.decoder.pending_len() > 0 {
                        tracing::debug!(
                            bytes = state.decoder.pending_len(),
                            "discarding unterminated trailing line"
                        );
                    }
                    state.body = None;
                }
            }
        }
    })
}
