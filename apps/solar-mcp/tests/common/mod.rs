//! Stub chat-completion backend served by axum on an ephemeral port.

#![allow(dead_code, clippy::unwrap_used, clippy::panic)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;
use solar_core::{DEFAULT_MODEL, UsageTracker};
use solar_mcp::{ChatExecutor, SolarClient};
use std::sync::{Arc, Mutex};

pub const TEST_API_KEY: &str = "test-key";

/// What the stub answers to every request.
pub enum Reply {
    Json(StatusCode, Value),
    Sse(String),
}

/// A request seen by the stub.
#[derive(Debug, Clone)]
pub struct Seen {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct Stub {
    reply: Arc<Reply>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

pub struct Backend {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Backend {
    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Seen {
        self.requests().pop().expect("no request reached the stub")
    }

    pub fn client(&self) -> SolarClient {
        SolarClient::new(TEST_API_KEY, self.base_url.clone())
    }

    pub fn executor(&self) -> ChatExecutor {
        ChatExecutor::new(self.client(), Arc::new(UsageTracker::new()), DEFAULT_MODEL)
    }
}

async fn completions(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.seen.lock().unwrap().push(Seen {
        authorization,
        body,
    });

    match &*stub.reply {
        Reply::Json(status, value) => (*status, Json(value.clone())).into_response(),
        Reply::Sse(text) => (
            [(header::CONTENT_TYPE, "text/event-stream")],
            text.clone(),
        )
            .into_response(),
    }
}

/// Start a stub serving `POST /v1/chat/completions`.
pub async fn spawn_backend(reply: Reply) -> Backend {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = Stub {
        reply: Arc::new(reply),
        seen: Arc::clone(&seen),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Backend {
        base_url: format!("http://{addr}/v1"),
        seen,
    }
}

/// `data:` line carrying one content fragment.
pub fn delta_line(content: &str, finish_reason: Option<&str>) -> String {
    let chunk = serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": "solar-pro2",
        "choices": [{
            "index": 0,
            "delta": {"content": content},
            "finish_reason": finish_reason,
        }],
    });
    format!("data: {chunk}\n\n")
}

/// `data:` line carrying only usage.
pub fn usage_line(prompt: u64, completion: u64) -> String {
    let chunk = serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": "solar-pro2",
        "choices": [],
        "usage": {
            "prompt_tokens": prompt,
            "completion_tokens": completion,
            "total_tokens": prompt + completion,
        },
    });
    format!("data: {chunk}\n\n")
}

pub const DONE_LINE: &str = "data: [DONE]\n\n";

/// The blocking response used by the `hi` -> `hello` example.
pub fn hello_response() -> Value {
    serde_json::json!({
        "choices": [{
            "message": {"role": "assistant", "content": "hello"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}
    })
}

pub fn unauthorized() -> Reply {
    Reply::Json(
        StatusCode::UNAUTHORIZED,
        serde_json::json!({"error": {"message": "invalid api key"}}),
    )
}
