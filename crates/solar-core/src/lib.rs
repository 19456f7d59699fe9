//! # solar-core
//!
//! Wire model and accounting for the Solar MCP bridge - THE LOGIC.
//!
//! This crate holds everything that does not need a socket:
//! - `types` - chat-completion requests, responses and streaming chunks
//! - `sse` - incremental decoder turning `data: ...` lines into chunks
//! - `usage` - process-lifetime token usage tracker
//! - `models` - the catalog of Solar models and API defaults
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - The decoder consumes raw bytes; the app layer decides where they come from
//! - The tracker is safe to share across threads behind an `Arc`

// =============================================================================
// MODULES
// =============================================================================

pub mod models;
pub mod sse;
pub mod types;
pub mod usage;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use models::{API_BASE_URL, DEFAULT_MODEL, SOLAR_MODELS, SolarModel, find_model};
pub use sse::{DONE_SENTINEL, DATA_PREFIX, SseDecoder, SseEvent};
pub use types::{
    ChatCompletionChoice, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse,
    ChatMessage, ResponseMessage, Role, StreamChoice, StreamDelta, Usage,
};
pub use usage::{UsageStats, UsageTracker};
