//! MCP SSE transport
//!
//! `GET /sse` opens a session: the server allocates a session id, starts an
//! MCP service for it and answers with an event stream whose first event
//! (`endpoint`) names the POST URL. Clients send JSON-RPC messages to
//! `POST /messages?session_id=<id>`; replies and notifications come back on
//! the event stream as `message` events.
//!
//! A session lives exactly as long as its event stream. When the client
//! disconnects or the server shuts down the stream is dropped, the id is
//! forgotten and the session's service task is aborted, which cancels any
//! call still waiting on the backend.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::{
    channel::mpsc,
    stream::{self, BoxStream},
    SinkExt, Stream, StreamExt,
};
use rmcp::{
    model::{ClientJsonRpcMessage, ServerJsonRpcMessage},
    ServiceExt,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::server::WebSearchMcpServer;

/// Path of the event stream
pub const SSE_PATH: &str = "/sse";

/// Path of the POST channel
pub const MESSAGE_PATH: &str = "/messages";

/// Buffered messages per direction and session
const CHANNEL_CAPACITY: usize = 64;

/// SSE transport settings
#[derive(Debug, Clone)]
pub struct SseConfig {
    /// Interval between keep-alive comments on idle streams
    pub keep_alive: Duration,
    /// Cancelled on server shutdown; ends every open stream
    pub shutdown: CancellationToken,
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            keep_alive: Duration::from_secs(15),
            shutdown: CancellationToken::new(),
        }
    }
}

type ClientSender = mpsc::Sender<ClientJsonRpcMessage>;

/// Open sessions, keyed by id
#[derive(Clone, Default)]
struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, ClientSender>>>,
}

impl SessionRegistry {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ClientSender>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, id: String, sender: ClientSender) {
        self.lock().insert(id, sender);
    }

    fn get(&self, id: &str) -> Option<ClientSender> {
        self.lock().get(id).cloned()
    }

    fn remove(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }
}

#[derive(Clone)]
struct SseState {
    server: WebSearchMcpServer,
    sessions: SessionRegistry,
    config: SseConfig,
}

/// Create the router serving [`SSE_PATH`] and [`MESSAGE_PATH`]
pub fn router(server: WebSearchMcpServer, config: SseConfig) -> Router {
    let state = SseState {
        server,
        sessions: SessionRegistry::default(),
        config,
    };

    Router::new()
        .route(SSE_PATH, get(connect))
        .route(MESSAGE_PATH, post(post_message))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Forgets the session and stops its service when the stream is dropped
struct SessionGuard {
    id: String,
    sessions: SessionRegistry,
    task: AbortHandle,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.task.abort();
        if self.sessions.remove(&self.id) {
            tracing::info!(session_id = %self.id, "SSE session closed");
        }
    }
}

/// Event stream of one session; owns the session's lifetime
struct SessionStream {
    inner: BoxStream<'static, Result<Event, Infallible>>,
    _guard: SessionGuard,
}

impl Stream for SessionStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

async fn connect(State(state): State<SseState>) -> Sse<SessionStream> {
    let session_id = Uuid::new_v4().simple().to_string();

    let (client_tx, client_rx) = mpsc::channel::<ClientJsonRpcMessage>(CHANNEL_CAPACITY);
    let (server_tx, server_rx) = mpsc::channel::<ServerJsonRpcMessage>(CHANNEL_CAPACITY);
    state.sessions.insert(session_id.clone(), client_tx);

    let server = state.server.clone();
    let id = session_id.clone();
    let task = tokio::spawn(async move {
        match server.serve((server_tx, client_rx)).await {
            Ok(running) => {
                if let Err(e) = running.waiting().await {
                    tracing::warn!(session_id = %id, "SSE session task failed: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!(session_id = %id, "SSE session did not initialize: {}", e);
            }
        }
    });

    tracing::info!(session_id = %session_id, "SSE session opened");

    let endpoint = format!("{}?session_id={}", MESSAGE_PATH, session_id);
    let messages = server_rx.filter_map(|message| async move {
        match serde_json::to_string(&message) {
            Ok(json) => Some(Event::default().event("message").data(json)),
            Err(e) => {
                tracing::warn!("Dropping unserializable message: {}", e);
                None
            }
        }
    });
    let events = stream::once(async move { Event::default().event("endpoint").data(endpoint) })
        .chain(messages)
        .map(Ok::<_, Infallible>)
        .take_until(state.config.shutdown.clone().cancelled_owned())
        .boxed();

    let stream = SessionStream {
        inner: events,
        _guard: SessionGuard {
            id: session_id,
            sessions: state.sessions.clone(),
            task: task.abort_handle(),
        },
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(state.config.keep_alive))
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: String,
}

async fn post_message(
    State(state): State<SseState>,
    Query(query): Query<SessionQuery>,
    body: Result<Json<ClientJsonRpcMessage>, JsonRejection>,
) -> Result<StatusCode, GatewayError> {
    let mut sender = state
        .sessions
        .get(&query.session_id)
        .ok_or_else(|| GatewayError::SessionNotFound(query.session_id.clone()))?;

    let Json(message) = body.map_err(|e| GatewayError::invalid(e.body_text()))?;

    // A closed channel means the session ended between lookup and send.
    sender
        .send(message)
        .await
        .map_err(|_| GatewayError::SessionNotFound(query.session_id))?;

    Ok(StatusCode::ACCEPTED)
}
