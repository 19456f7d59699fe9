//! # Solar Chat Tool
//!
//! Runs one `solar_chat` invocation end to end: builds the request, picks the
//! streaming or blocking path, folds the answer into a [`SolarChatResult`]
//! and records the token usage.
//!
//! The streaming path is taken only when streaming is requested *and* a
//! progress callback is supplied. Without a callback nobody can observe the
//! fragments, so the blocking call is used instead.

use crate::client::{ClientError, SolarClient};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use solar_core::{ChatCompletionRequest, ChatMessage, Usage, UsageTracker, find_model};
use std::sync::Arc;

/// Name under which the tool is registered.
pub const SOLAR_CHAT_TOOL_NAME: &str = "solar_chat";

/// Description shown to the MCP host.
pub const SOLAR_CHAT_TOOL_DESCRIPTION: &str = "Send a chat completion request to Upstage Solar models.

Available models:
- solar-pro2: High performance model (default)
- solar-mini: Fast and efficient model

Returns the model's response along with token usage statistics.";

/// Progress callback receiving each new content fragment.
pub type ProgressFn<'a> = &'a mut (dyn FnMut(&str) + Send);

// =============================================================================
// PARAMETERS & RESULT
// =============================================================================

/// Arguments of the `solar_chat` tool.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SolarChatParams {
    /// Array of messages in the conversation.
    #[schemars(description = "Array of messages in the conversation")]
    pub messages: Vec<ChatMessage>,

    /// Model to use. Defaults to solar-pro2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Model to use (solar-pro2 or solar-mini). Defaults to solar-pro2")]
    pub model: Option<String>,

    /// Sampling temperature (0-2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Sampling temperature (0-2). Higher values make output more random",
        range(min = 0, max = 2)
    )]
    pub temperature: Option<f64>,

    /// Maximum number of tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Maximum number of tokens to generate")]
    pub max_tokens: Option<u32>,

    /// Nucleus sampling parameter (0-1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Nucleus sampling parameter (0-1)", range(min = 0, max = 1))]
    pub top_p: Option<f64>,

    /// Stop sequences to end generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Stop sequences to end generation")]
    pub stop: Option<Vec<String>>,

    /// Whether to stream the response. Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Whether to stream the response. Defaults to true")]
    pub stream: Option<bool>,
}

impl SolarChatParams {
    /// Parameters with only a conversation set.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            top_p: None,
            stop: None,
            stream: None,
        }
    }

    fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(true)
    }
}

/// Normalized outcome of one chat invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolarChatResult {
    pub content: String,
    pub model: String,
    pub usage: Usage,
    pub finish_reason: Option<String>,
}

// =============================================================================
// EXECUTOR
// =============================================================================

/// Executes `solar_chat` calls against one client and one shared tracker.
#[derive(Debug, Clone)]
pub struct ChatExecutor {
    client: SolarClient,
    tracker: Arc<UsageTracker>,
    default_model: String,
}

impl ChatExecutor {
    pub fn new(client: SolarClient, tracker: Arc<UsageTracker>, default_model: impl Into<String>) -> Self {
        Self {
            client,
            tracker,
            default_model: default_model.into(),
        }
    }

    pub fn client(&self) -> &SolarClient {
        &self.client
    }

    pub fn tracker(&self) -> &UsageTracker {
        &self.tracker
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Run one chat invocation.
    ///
    /// Usage is added to the tracker exactly once, and only when the call
    /// succeeded.
    pub async fn execute(
        &self,
        params: SolarChatParams,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<SolarChatResult, ClientError> {
        let streaming = params.wants_stream();
        let request = self.build_request(params);

        let result = match on_progress {
            Some(on_progress) if streaming => self.run_streaming(request, on_progress).await?,
            _ => self.run_blocking(request).await?,
        };

        self.tracker.add_usage(&result.usage);
        tracing::info!(
            model = %result.model,
            prompt_tokens = result.usage.prompt_tokens,
            completion_tokens = result.usage.completion_tokens,
            finish_reason = result.finish_reason.as_deref().unwrap_or("none"),
            "solar_chat completed"
        );
        Ok(result)
    }

    fn build_request(&self, params: SolarChatParams) -> ChatCompletionRequest {
        let model = params
            .model
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.default_model.clone());
        if find_model(&model).is_none() {
            tracing::warn!(model = %model, "model is not in the Solar catalog, forwarding as given");
        }

        let mut request = ChatCompletionRequest::new(model, params.messages);
        request.temperature = params.temperature;
        request.max_tokens = params.max_tokens;
        request.top_p = params.top_p;
        request.stop = params.stop;
        request
    }

    async fn run_streaming(
        &self,
        request: ChatCompletionRequest,
        on_progress: ProgressFn<'_>,
    ) -> Result<SolarChatResult, ClientError> {
        let model = request.model.clone();
        let mut chunks = self.client.chat_completion_stream(request).await?;

        let mut content = String::new();
        let mut usage = None;
        let mut finish_reason = None;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            if let Some(fragment) = chunk.content().filter(|f| !f.is_empty()) {
                content.push_str(fragment);
                on_progress(fragment);
            }
            if let Some(reason) = chunk.finish_reason() {
                finish_reason = Some(reason.to_string());
            }
            if chunk.usage.is_some() {
                usage = chunk.usage;
            }
        }

        Ok(SolarChatResult {
            content,
            model,
            usage: usage.unwrap_or_default(),
            finish_reason,
        })
    }

    async fn run_blocking(&self, request: ChatCompletionRequest) -> Result<SolarChatResult, ClientError> {
        let requested_model = request.model.clone();
        let response = self.client.chat_completion(request).await?;

        let model = if response.model.is_empty() {
            requested_model
        } else {
            response.model
        };
        let (content, finish_reason) = response
            .choices
            .into_iter()
            .next()
            .map(|choice| (choice.message.content.unwrap_or_default(), choice.finish_reason))
            .unwrap_or_default();

        Ok(SolarChatResult {
            content,
            model,
            usage: response.usage,
            finish_reason,
        })
    }
}
