//! # Solar HTTP Client
//!
//! Wrapper around the Upstage chat-completion endpoint for use by the MCP server.

use crate::stream::{ChunkStream, decode_chunks};
use solar_core::{ChatCompletionRequest, ChatCompletionResponse};
use thiserror::Error;

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Cannot reach the API.
    #[error("Cannot connect to Solar API at {url}: {reason}")]
    Connection { url: String, reason: String },

    /// The API answered with a non-success status.
    #[error("Upstage API Error: {status} {status_text}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The connection broke while reading a streamed body.
    #[error("Stream read error: {0}")]
    Stream(String),
}

impl ClientError {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// HTTP client that wraps calls to the chat-completion API.
#[derive(Clone)]
pub struct SolarClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for SolarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolarClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SolarClient {
    /// Create a new client for the given API base URL (e.g. `https://api.upstage.ai/v1`).
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the completion request with Bearer auth.
    fn completions(&self, body: &ChatCompletionRequest) -> reqwest::RequestBuilder {
        let url = format!("{}/chat/completions", self.base_url);
        self.http.post(url).bearer_auth(&self.api_key).json(body)
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send().await.map_err(|e| ClientError::Connection {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Turn a non-success status into `ClientError::Api`, keeping the raw body.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "chat completion rejected by API");
        Err(ClientError::Api {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }

    /// POST /chat/completions with `stream: false`.
    pub async fn chat_completion(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ClientError> {
        request.stream = false;
        tracing::debug!(model = %request.model, messages = request.messages.len(), "chat completion");

        let resp = self.send(self.completions(&request)).await?;
        let resp = Self::check_status(resp).await?;
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Stream(e.to_string()))?;
        serde_json::from_str::<ChatCompletionResponse>(&body)
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// POST /chat/completions with `stream: true`.
    ///
    /// Fails before yielding anything if the API rejects the request. The
    /// returned stream owns the response body and releases it once the
    /// `[DONE]` sentinel, the end of the body, or a read error is reached.
    pub async fn chat_completion_stream(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<ChunkStream, ClientError> {
        request.stream = true;
        tracing::debug!(model = %request.model, messages = request.messages.len(), "streaming chat completion");

        let resp = self.send(self.completions(&request)).await?;
        let resp = Self::check_status(resp).await?;
        Ok(Box::pin(decode_chunks(Box::pin(resp.bytes_stream()))))
    }
}
