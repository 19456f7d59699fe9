//! # Types Module
//!
//! Chat-completion wire types shared by the HTTP client and the MCP tool.
//!
//! Response types are lenient: envelope fields the remote API leaves out
//! fall back to their defaults instead of failing the whole response.

use serde::{Deserialize, Serialize};

// =============================================================================
// MESSAGES
// =============================================================================

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ChatMessage {
    /// The role of the message author.
    #[schemars(description = "The role of the message author")]
    pub role: Role,
    /// The content of the message.
    #[schemars(description = "The content of the message")]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// Body of `POST /chat/completions`.
///
/// The `stream` flag is owned by the client: it is overwritten according to
/// which call path is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(default)]
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Create a request with no sampling overrides.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            top_p: None,
            stop: None,
            stream: false,
        }
    }
}

// =============================================================================
// USAGE
// =============================================================================

/// Token accounting returned by the API for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    pub const fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

// =============================================================================
// BLOCKING RESPONSE
// =============================================================================

/// Message of a non-streaming choice.
///
/// Unlike [`ChatMessage`], every field is optional: a `null` content or an
/// unfamiliar role must not fail a response that was already billed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// One choice of a non-streaming response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatCompletionChoice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

/// Response to a request sent with `stream: false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    pub usage: Usage,
}

// =============================================================================
// STREAMING CHUNKS
// =============================================================================

/// Partial message carried by a streaming choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// One choice of a streaming chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: StreamDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// A single `data:` event of a streaming response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<StreamChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatCompletionChunk {
    /// Content fragment of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }

    /// Finish reason of the first choice, if any.
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_omits_unset_sampling_fields() {
        let req = ChatCompletionRequest::new("solar-mini", vec![ChatMessage::user("hi")]);
        let value = serde_json::to_value(&req).expect("serialize");

        assert_eq!(
            value,
            json!({
                "model": "solar-mini",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": false,
            })
        );
    }

    #[test]
    fn request_serializes_sampling_fields_when_set() {
        let mut req = ChatCompletionRequest::new("solar-pro2", vec![ChatMessage::system("be brief")]);
        req.temperature = Some(0.5);
        req.max_tokens = Some(64);
        req.top_p = Some(0.9);
        req.stop = Some(vec!["END".to_string()]);

        let value = serde_json::to_value(&req).expect("serialize");
        assert_eq!(value["temperature"], json!(0.5));
        assert_eq!(value["max_tokens"], json!(64));
        assert_eq!(value["top_p"], json!(0.9));
        assert_eq!(value["stop"], json!(["END"]));
        assert_eq!(value["messages"][0]["role"], json!("system"));
    }

    #[test]
    fn response_without_envelope_fields_still_parses() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "hello"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}
        }))
        .expect("parse");

        assert!(resp.model.is_empty());
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("hello"));
        assert_eq!(resp.choices[0].message.role.as_deref(), Some("assistant"));
        assert_eq!(resp.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.total_tokens, 5);
    }

    #[test]
    fn response_choice_tolerates_null_content_and_missing_message() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": null}, "finish_reason": "length"},
                {"finish_reason": "stop"},
                {"message": {"role": "tool", "content": "x"}}
            ]
        }))
        .expect("parse");

        assert_eq!(resp.choices[0].message.content, None);
        assert_eq!(resp.choices[0].finish_reason.as_deref(), Some("length"));
        assert_eq!(resp.choices[1].message, ResponseMessage::default());
        assert_eq!(resp.choices[2].message.role.as_deref(), Some("tool"));
    }

    #[test]
    fn chunk_accessors_read_first_choice() {
        let chunk: ChatCompletionChunk = serde_json::from_value(json!({
            "id": "c1",
            "model": "solar-pro2",
            "choices": [
                {"index": 0, "delta": {"content": "Hel"}, "finish_reason": null},
                {"index": 1, "delta": {"content": "ignored"}, "finish_reason": "stop"}
            ]
        }))
        .expect("parse");

        assert_eq!(chunk.content(), Some("Hel"));
        assert_eq!(chunk.finish_reason(), None);
        assert!(chunk.usage.is_none());
    }

    #[test]
    fn chunk_with_empty_choices_has_no_content() {
        let chunk: ChatCompletionChunk = serde_json::from_value(json!({
            "choices": [],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        }))
        .expect("parse");

        assert_eq!(chunk.content(), None);
        assert_eq!(chunk.usage, Some(Usage::new(1, 1)));
    }

    #[test]
    fn usage_new_sums_total() {
        let usage = Usage::new(10, 20);
        assert_eq!(usage.total_tokens, 30);
        assert_eq!(Usage::default().total_tokens, 0);
    }
}
