//! Test utilities for wealthwise-core
//!
//! This module provides a mock Generative Language (Gemini) server that
//! speaks enough of `generateContent` for integration tests and offline
//! development. Replies are scripted per test; every request is recorded.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::ai::{AIClient, GeminiBackend};

/// Key the test client sends
pub const TEST_API_KEY: &str = "test-key";

const DEFAULT_PLAN: &str = r#"[{"name":"Living Expenses","value":3000},{"name":"Discretionary Spending","value":500}]"#;
const DEFAULT_TEXT: &str = "You're doing fine. Put aside a small fixed amount this week.";

/// A request the server received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Model id from the URL path
    pub model: String,
    /// Value of the `x-goog-api-key` header
    pub api_key: Option<String>,
    /// Decoded JSON body
    pub body: Value,
}

impl RecordedRequest {
    /// Text of the first user part
    pub fn prompt(&self) -> &str {
        self.body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
    }

    /// Whether the request asked for JSON output
    pub fn is_structured(&self) -> bool {
        self.body["generationConfig"]["responseMimeType"] == "application/json"
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Error(StatusCode, String),
}

#[derive(Default)]
struct ServerState {
    replies: VecDeque<Reply>,
    requests: Vec<RecordedRequest>,
    delay: Option<Duration>,
}

type Shared = Arc<Mutex<ServerState>>;

fn lock(state: &Shared) -> MutexGuard<'_, ServerState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock Gemini server for testing and development
pub struct MockGeminiServer {
    addr: SocketAddr,
    state: Shared,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(ServerState::default()));

        let app = Router::new()
            .route("/v1beta/models/:call", get(handle_model).post(handle_generate))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("mock server");
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A Gemini client pointed at this server
    pub fn client(&self) -> AIClient {
        AIClient::Gemini(GeminiBackend::with_base_url(&self.url(), TEST_API_KEY))
    }

    /// Queue the text of the next candidate
    pub fn respond_with(&self, text: impl Into<String>) {
        lock(&self.state).replies.push_back(Reply::Text(text.into()));
    }

    /// Queue an HTTP error for the next request
    pub fn fail_with(&self, status: StatusCode, message: impl Into<String>) {
        lock(&self.state)
            .replies
            .push_back(Reply::Error(status, message.into()));
    }

    /// Delay every response
    pub fn set_delay(&self, delay: Duration) {
        lock(&self.state).delay = Some(delay);
    }

    /// All generateContent requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.state).requests.len()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Model metadata endpoint (health check)
async fn handle_model(Path(model): Path<String>) -> Json<Value> {
    Json(json!({
        "name": format!("models/{}", model),
        "supportedGenerationMethods": ["generateContent"]
    }))
}

/// `POST /v1beta/models/{model}:generateContent`
async fn handle_generate(
    State(state): State<Shared>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(model) = call.strip_suffix(":generateContent") else {
        return (StatusCode::NOT_FOUND, error_body(404, "unknown method")).into_response();
    };

    let recorded = RecordedRequest {
        model: model.to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    };
    let structured = recorded.is_structured();

    let (reply, delay) = {
        let mut guard = lock(&state);
        guard.requests.push(recorded);
        (guard.replies.pop_front(), guard.delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match reply {
        Some(Reply::Error(status, message)) => {
            (status, error_body(status.as_u16(), &message)).into_response()
        }
        Some(Reply::Text(text)) => Json(candidate(&text)).into_response(),
        None if structured => Json(candidate(DEFAULT_PLAN)).into_response(),
        None => Json(candidate(DEFAULT_TEXT)).into_response(),
    }
}

fn candidate(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn error_body(code: u16, message: &str) -> Json<Value> {
    Json(json!({ "error": { "code": code, "message": message } }))
}
