//! Shared fixtures: a stub SearXNG, server spawning and an SSE reader

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use futures::{Stream, StreamExt};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use web_search_server::backends::SearchBackend;
use web_search_server::bootstrap;
use web_search_server::config::RuntimeConfig;
use web_search_server::tool::ToolDefinition;
use web_search_server::{GatewayError, SearchQuery, SearchResult, WebSearch};

/// Serve `app` on an ephemeral port and return its base URL (no trailing slash)
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A SearXNG stand-in answering every query with one fixed result
pub struct StubSearxng {
    pub url: Url,
    hits: Arc<AtomicUsize>,
}

#[derive(Clone)]
struct StubState {
    hits: Arc<AtomicUsize>,
    status: StatusCode,
}

async fn stub_search(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    assert_eq!(params.get("format").map(String::as_str), Some("json"));

    if !state.status.is_success() {
        return (state.status, Json(json!({ "error": "boom" })));
    }
    let body = json!({
        "query": params.get("q"),
        "results": [
            { "title": "A", "url": "http://a", "content": "...", "engine": "stub" }
        ]
    });
    (state.status, Json(body))
}

impl StubSearxng {
    pub async fn start() -> Self {
        Self::serve(StatusCode::OK).await
    }

    /// A stub that answers every query with HTTP 500
    pub async fn failing() -> Self {
        Self::serve(StatusCode::INTERNAL_SERVER_ERROR).await
    }

    async fn serve(status: StatusCode) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/search", get(stub_search))
            .with_state(StubState {
                hits: hits.clone(),
                status,
            });

        let url = Url::parse(&spawn(app).await).unwrap();
        Self { url, hits }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Backend whose searches never finish; records when a search is dropped
#[derive(Default)]
pub struct StallingBackend {
    started: AtomicBool,
    abandoned: Arc<AtomicBool>,
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl StallingBackend {
    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for StallingBackend {
    fn name(&self) -> &str {
        "stalling"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<SearchResult>, GatewayError> {
        let _flag = SetOnDrop(self.abandoned.clone());
        self.started.store(true, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(Vec::new())
    }
}

/// Poll `condition` every 20ms for up to five seconds
pub async fn wait_until(what: &str, condition: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(tokio::time::Instant::now() < deadline, "timed out waiting until {}", what);
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// The search results every transport should report for the stub
pub fn expected_results() -> Value {
    json!([{ "title": "A", "url": "http://a", "snippet": "..." }])
}

pub fn config(base_url: Option<Url>, bearer_token: Option<&str>) -> RuntimeConfig {
    RuntimeConfig {
        bearer_token: bearer_token.map(str::to_string),
        backend_base_url: base_url,
        timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

pub fn web_search(config: &RuntimeConfig) -> Arc<WebSearch> {
    bootstrap::web_search(config).unwrap()
}

pub fn web_search_with(backend: Arc<dyn SearchBackend>) -> Arc<WebSearch> {
    Arc::new(WebSearch::new(Arc::new(ToolDefinition::searxng(5)), backend))
}

/// One server-sent event
#[derive(Debug)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Incremental reader over an event-stream response body
pub struct SseReader {
    body: Pin<Box<dyn Stream<Item = reqwest::Result<Vec<u8>>> + Send>>,
    buffer: String,
}

impl SseReader {
    pub fn new(response: reqwest::Response) -> Self {
        Self {
            body: response.bytes_stream().map(|r| r.map(|b| b.to_vec())).boxed(),
            buffer: String::new(),
        }
    }

    /// Next event carrying data; keep-alive comments are skipped
    pub async fn next_event(&mut self) -> Option<SseEvent> {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let block: String = self.buffer.drain(..end + 2).collect();
                let mut event = SseEvent {
                    event: "message".to_string(),
                    data: String::new(),
                };
                for line in block.lines() {
                    if let Some(name) = line.strip_prefix("event:") {
                        event.event = name.trim().to_string();
                    } else if let Some(data) = line.strip_prefix("data:") {
                        if !event.data.is_empty() {
                            event.data.push('\n');
                        }
                        event.data.push_str(data.trim_start());
                    }
                }
                if event.data.is_empty() {
                    continue;
                }
                return Some(event);
            }

            match self.body.next().await {
                Some(Ok(chunk)) => self
                    .buffer
                    .push_str(&String::from_utf8_lossy(&chunk).replace("\r\n", "\n")),
                _ => return None,
            }
        }
    }

    /// Skip ahead to the JSON-RPC response with the given id
    pub async fn response(&mut self, id: u64) -> Value {
        let wait = async {
            while let Some(event) = self.next_event().await {
                let Ok(message) = serde_json::from_str::<Value>(&event.data) else {
                    continue;
                };
                if message["id"] == json!(id) {
                    return message;
                }
            }
            panic!("event stream ended before response {}", id);
        };
        tokio::time::timeout(Duration::from_secs(10), wait)
            .await
            .expect("timed out waiting for response")
    }
}

pub fn initialize_request(id: u64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "adapter-tests", "version": "0.1.0" }
        }
    })
}

pub fn initialized_notification() -> Value {
    json!({ "jsonrpc": "2.0", "method": "notifications/initialized" })
}

pub fn list_tools_request(id: u64) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "method": "tools/list", "params": {} })
}

pub fn call_tool_request(id: u64, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": "search_searxng", "arguments": arguments }
    })
}

/// Decode the text item of a tools/call result
pub fn tool_payload(response: &Value) -> (bool, Value) {
    let result = &response["result"];
    let is_error = result["isError"].as_bool().unwrap_or(false);
    let text = result["content"][0]["text"]
        .as_str()
        .expect("tool result has a text item");
    (is_error, serde_json::from_str(text).unwrap())
}
