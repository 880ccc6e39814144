//! MCP Streamable HTTP transport
//!
//! rmcp's `StreamableHttpService` does the protocol work: it issues the
//! `Mcp-Session-Id`, correlates requests with responses and streams results
//! back on the HTTP response of the call.

use axum::Router;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::server::WebSearchMcpServer;

/// Path of the MCP endpoint
pub const MCP_PATH: &str = "/mcp";

/// Create the router serving MCP at [`MCP_PATH`]
pub fn router(server: WebSearchMcpServer, keep_alive: Option<Duration>) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            sse_keep_alive: keep_alive,
            stateful_mode: true,
            ..Default::default()
        },
    );

    Router::new()
        .route_service(MCP_PATH, service)
        .layer(TraceLayer::new_for_http())
}
