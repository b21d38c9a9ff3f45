//! Integration test harness for ECOthread.
//!
//! Each test spawns the real router on an ephemeral port, backed by the
//! in-memory user store and session store. Assistant tests point the Gemini
//! client at a scripted mock server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ecothread-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_sessions::MemoryStore;

use ecothread_client::ApiClient;
use ecothread_server::config::{GeminiConfig, ServerConfig};
use ecothread_server::db::MemoryUserStore;
use ecothread_server::state::AppState;

/// Model names the app is configured with when the mock is running.
pub const CHAT_MODEL: &str = "gemini-test";
pub const MAPS_MODEL: &str = "gemini-maps-test";

/// Password used by [`TestApp::register`].
pub const TEST_PASSWORD: &str = "secret-thread";

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind((IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });
    addr
}

// ============================================================================
// Mock Gemini
// ============================================================================

/// A call received by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// `model:method` path segment.
    pub call: String,
    pub body: Value,
}

/// Scripted Gemini behaviour.
#[derive(Debug, Clone, Default)]
pub struct MockGemini {
    /// Text answer for `generateContent` (the structured endpoints).
    pub json_text: String,
    /// Chunks streamed back by `streamGenerateContent`.
    pub chat_chunks: Vec<String>,
    /// Answer every call with this status instead.
    pub fail_with: Option<StatusCode>,
}

#[derive(Clone)]
struct MockState {
    script: MockGemini,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn maps_response() -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": "Two shops near you." }] },
            "groundingMetadata": {
                "groundingChunks": [
                    {
                        "maps": {
                            "title": "Stitch & Mend",
                            "uri": "https://maps.google.com/?cid=1",
                            "placeAnswerSources": [{ "reviewSnippets": [{ "review": "Fixed my zipper in a day." }] }]
                        }
                    },
                    { "maps": {} },
                    { "web": { "uri": "https://example.com" } }
                ]
            }
        }]
    })
}

async fn mock_generate(
    State(state): State<MockState>,
    Path(call): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.calls.lock().await.push(RecordedCall {
        call: call.clone(),
        body: body.clone(),
    });

    if let Some(status) = state.script.fail_with {
        let error = json!({
            "error": { "code": status.as_u16(), "message": "mock failure", "status": "INTERNAL" }
        });
        return (status, Json(error)).into_response();
    }

    if call.ends_with(":streamGenerateContent") {
        let events: String = state
            .script
            .chat_chunks
            .iter()
            .map(|chunk| format!("data: {}\r\n\r\n", text_response(chunk)))
            .collect();
        return ([(header::CONTENT_TYPE, "text/event-stream")], events).into_response();
    }

    if body.get("tools").is_some() {
        return Json(maps_response()).into_response();
    }

    Json(text_response(&state.script.json_text)).into_response()
}

// ============================================================================
// Test App
// ============================================================================

/// A running server plus a cookie-keeping HTTP client.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub users: MemoryUserStore,
    gemini_calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl TestApp {
    /// Start the app without an assistant.
    pub async fn spawn() -> Self {
        Self::start(None, Duration::ZERO).await
    }

    /// Start the app with a scripted Gemini mock.
    pub async fn spawn_with_gemini(script: MockGemini) -> Self {
        Self::start(Some(script), Duration::ZERO).await
    }

    /// Start the app with a simulated payment that takes `delay`.
    pub async fn spawn_with_checkout_delay(delay: Duration) -> Self {
        Self::start(None, delay).await
    }

    async fn start(script: Option<MockGemini>, checkout_delay: Duration) -> Self {
        let gemini_calls = Arc::new(Mutex::new(Vec::new()));

        let gemini = match script {
            Some(script) => {
                let mock = Router::new()
                    .route("/v1beta/models/{call}", post(mock_generate))
                    .with_state(MockState {
                        script,
                        calls: gemini_calls.clone(),
                    });
                let addr = serve(mock).await;
                Some(GeminiConfig {
                    api_key: SecretString::from("test-api-key"),
                    model: CHAT_MODEL.to_string(),
                    maps_model: MAPS_MODEL.to_string(),
                    api_base: format!("http://{addr}/v1beta"),
                })
            }
            None => None,
        };

        let config = ServerConfig {
            database_url: SecretString::from("postgres://unused/ecothread_test"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost".to_string(),
            gemini,
            checkout_delay,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let users = MemoryUserStore::new();
        let state =
            AppState::new(config, Arc::new(users.clone())).expect("Failed to build app state");
        let addr = serve(ecothread_server::app(state, MemoryStore::default())).await;

        Self {
            base_url: format!("http://{addr}"),
            client: new_client(),
            users,
            gemini_calls,
        }
    }

    /// Absolute URL for a path on the app.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Typed client pointed at this app's API.
    #[must_use]
    pub fn api_client(&self) -> ApiClient {
        ApiClient::new(self.url("/api"))
    }

    /// A second visitor with their own cookie jar.
    #[must_use]
    pub fn other_visitor(&self) -> Client {
        new_client()
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        read(self.client.get(self.url(path)).send().await).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        read(self.client.post(self.url(path)).json(&body).send().await).await
    }

    pub async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        read(self.client.put(self.url(path)).json(&body).send().await).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> (StatusCode, Value) {
        read(self.client.patch(self.url(path)).json(&body).send().await).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        read(self.client.delete(self.url(path)).send().await).await
    }

    /// Register (and thereby sign in) a user; returns the user JSON.
    pub async fn register(&self, email: &str, name: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/auth/register",
                json!({ "email": email, "password": TEST_PASSWORD, "name": name }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["user"].clone()
    }

    /// Calls the mock Gemini server received so far.
    pub async fn gemini_calls(&self) -> Vec<RecordedCall> {
        self.gemini_calls.lock().await.clone()
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

async fn read(response: reqwest::Result<reqwest::Response>) -> (StatusCode, Value) {
    let response = response.expect("Request failed");
    let status = StatusCode::from_u16(response.status().as_u16()).expect("Invalid status");
    let text = response.text().await.expect("Failed to read body");
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, body)
}
