//! # Solar MCP Server
//!
//! Implements `ServerHandler` with the `solar_chat` tool and two read-only
//! resources (`solar://usage`, `solar://models`).
//!
//! Tool failures never cross the protocol boundary as errors: bad arguments
//! and API failures come back as error-flagged tool results. Unknown resource
//! URIs are protocol errors.

use crate::chat::{
    ChatExecutor, ProgressFn, SOLAR_CHAT_TOOL_DESCRIPTION, SOLAR_CHAT_TOOL_NAME, SolarChatParams,
};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParams, CallToolResult, Content, JsonObject,
        ListResourcesResult, ListToolsResult, Meta, PaginatedRequestParams,
        ProgressNotificationParam, ProgressToken, RawResource, ReadResourceRequestParams,
        ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo, Tool,
    },
    service::{Peer, RequestContext},
};
use serde_json::{Value, json};
use solar_core::SOLAR_MODELS;
use std::sync::Arc;

/// URI of the aggregate usage resource.
pub const USAGE_RESOURCE_URI: &str = "solar://usage";

/// URI of the model catalog resource.
pub const MODELS_RESOURCE_URI: &str = "solar://models";

const MESSAGES_REQUIRED: &str = "Error: messages parameter is required and must be an array";

// =============================================================================
// MCP SERVER
// =============================================================================

/// MCP server that bridges to the Upstage Solar chat API.
#[derive(Debug, Clone)]
pub struct SolarMcp {
    executor: ChatExecutor,
}

impl SolarMcp {
    pub fn new(executor: ChatExecutor) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &ChatExecutor {
        &self.executor
    }

    /// Run `solar_chat` with raw tool arguments.
    ///
    /// Always returns a tool result; failures are flagged with `is_error`.
    /// On success the answer is the text content and `{model, usage,
    /// finish_reason}` travels in the result's `_meta`.
    pub async fn solar_chat(
        &self,
        arguments: Option<JsonObject>,
        on_progress: Option<ProgressFn<'_>>,
    ) -> CallToolResult {
        let params = match parse_arguments(arguments) {
            Ok(params) => params,
            Err(message) => {
                tracing::warn!("solar_chat rejected: {}", message);
                return CallToolResult::error(vec![Content::text(message)]);
            }
        };

        match self.executor.execute(params, on_progress).await {
            Ok(chat) => {
                let mut meta = Meta::new();
                meta.insert("model".to_string(), json!(chat.model));
                meta.insert("usage".to_string(), json!(chat.usage));
                meta.insert("finish_reason".to_string(), json!(chat.finish_reason));
                let mut result = CallToolResult::success(vec![Content::text(chat.content)]);
                result.meta = Some(meta);
                result
            }
            Err(e) => {
                tracing::error!("solar_chat failed: {}", e);
                CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
            }
        }
    }

    /// Run `solar_chat`, forwarding each content fragment as a progress notification.
    async fn solar_chat_with_progress(
        &self,
        arguments: Option<JsonObject>,
        token: ProgressToken,
        peer: Peer<RoleServer>,
    ) -> CallToolResult {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();

        let forwarder = tokio::spawn(async move {
            let mut sent: u32 = 0;
            while let Some(fragment) = rx.recv().await {
                sent = sent.saturating_add(1);
                let notification = ProgressNotificationParam {
                    progress_token: token.clone(),
                    progress: f64::from(sent),
                    total: None,
                    message: Some(fragment),
                };
                if let Err(e) = peer.notify_progress(notification).await {
                    tracing::debug!("progress notification not delivered: {}", e);
                }
            }
        });

        let mut forward = move |fragment: &str| {
            if let Err(e) = tx.send(fragment.to_string()) {
                tracing::debug!("progress fragment dropped: {}", e);
            }
        };
        let progress: ProgressFn<'_> = &mut forward;
        let result = self.solar_chat(arguments, Some(progress)).await;
        drop(forward);

        if let Err(e) = forwarder.await {
            tracing::warn!("progress forwarder failed: {}", e);
        }
        result
    }

    /// JSON text of a resource.
    pub fn resource_text(&self, uri: &str) -> Result<String, McpError> {
        let rendered = match uri {
            USAGE_RESOURCE_URI => serde_json::to_string_pretty(&self.executor.tracker().stats()),
            MODELS_RESOURCE_URI => serde_json::to_string_pretty(SOLAR_MODELS),
            _ => {
                return Err(McpError::resource_not_found(
                    format!("Unknown resource: {uri}"),
                    Some(json!({ "uri": uri })),
                ));
            }
        };
        rendered.map_err(|e| McpError::internal_error(e.to_string(), None))
    }
}

// =============================================================================
// TOOL & RESOURCE DESCRIPTORS
// =============================================================================

/// The `solar_chat` tool with its input schema.
pub fn solar_chat_tool() -> Tool {
    let schema = match serde_json::to_value(schemars::schema_for!(SolarChatParams)) {
        Ok(Value::Object(map)) => map,
        _ => JsonObject::new(),
    };
    Tool::new(
        SOLAR_CHAT_TOOL_NAME,
        SOLAR_CHAT_TOOL_DESCRIPTION,
        Arc::new(schema),
    )
}

/// The resources served by this server.
pub fn resources() -> Vec<Resource> {
    vec![
        json_resource(
            USAGE_RESOURCE_URI,
            "Usage Statistics",
            "Current session API usage and token statistics",
        ),
        json_resource(
            MODELS_RESOURCE_URI,
            "Available Models",
            "List of available Solar models",
        ),
    ]
}

fn json_resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some("application/json".to_string());
    raw.no_annotation()
}

/// Validate raw tool arguments into parameters.
fn parse_arguments(arguments: Option<JsonObject>) -> Result<SolarChatParams, String> {
    let arguments = arguments.unwrap_or_default();
    if !arguments.get("messages").is_some_and(Value::is_array) {
        return Err(MESSAGES_REQUIRED.to_string());
    }
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| format!("Error: invalid arguments: {e}"))
}

// =============================================================================
// SERVER HANDLER
// =============================================================================

impl ServerHandler for SolarMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Upstage Solar chat server. Use the solar_chat tool to send a conversation \
                 to a Solar model; read solar://usage for token statistics and \
                 solar://models for the available models."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(vec![solar_chat_tool()]))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if request.name != SOLAR_CHAT_TOOL_NAME {
            tracing::warn!("unknown tool requested: {}", request.name);
            return Ok(CallToolResult::error(vec![Content::text(format!(
                "Unknown tool: {}",
                request.name
            ))]));
        }

        let result = match context.meta.get_progress_token() {
            Some(token) => {
                self.solar_chat_with_progress(request.arguments, token, context.peer.clone())
                    .await
            }
            None => self.solar_chat(request.arguments, None).await,
        };
        Ok(result)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self.resource_text(&request.uri)?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
