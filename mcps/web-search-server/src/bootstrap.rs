//! Startup: pick one adapter, bind it, serve until shutdown
//!
//! The mode is chosen once per process. Exactly one adapter is built; the
//! others are never constructed.

use anyhow::{Context, Result};
use axum::Router;
use rmcp::{transport::stdio, ServiceExt};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::auth::AuthGate;
use crate::backends::{SearXNGBackend, SearchBackend};
use crate::config::RuntimeConfig;
use crate::openapi::{self, AppState};
use crate::search::WebSearch;
use crate::server::WebSearchMcpServer;
use crate::tool::ToolDefinition;
use crate::transport::{self, SseConfig};

/// How long open connections may linger after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Keep-alive interval for MCP event streams
const MCP_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Server mode selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// REST endpoint with a JSON body
    Openapi,
    /// MCP server
    Mcp,
}

/// MCP wire transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum McpTransport {
    StreamableHttp,
    Sse,
    Stdio,
}

/// The adapter a process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    OpenApi,
    Mcp(McpTransport),
}

impl ServerMode {
    pub fn new(mode: Mode, transport: McpTransport) -> Self {
        match mode {
            Mode::Openapi => ServerMode::OpenApi,
            Mode::Mcp => ServerMode::Mcp(transport),
        }
    }
}

impl std::fmt::Display for ServerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerMode::OpenApi => write!(f, "openapi"),
            ServerMode::Mcp(McpTransport::StreamableHttp) => write!(f, "mcp (streamable-http)"),
            ServerMode::Mcp(McpTransport::Sse) => write!(f, "mcp (sse)"),
            ServerMode::Mcp(McpTransport::Stdio) => write!(f, "mcp (stdio)"),
        }
    }
}

/// Build the shared search capability from the configuration
pub fn web_search(config: &RuntimeConfig) -> Result<Arc<WebSearch>> {
    let tool = Arc::new(ToolDefinition::searxng(config.default_results));
    let backend: Arc<dyn SearchBackend> =
        Arc::new(SearXNGBackend::from_config(config).context("creating HTTP client")?);

    match &config.backend_base_url {
        Some(url) => tracing::info!("Using SearXNG backend at {}", url),
        None => tracing::warn!("SEARXNG_BASE_URL is not set; search is disabled"),
    }

    Ok(Arc::new(WebSearch::new(tool, backend)))
}

/// Build the HTTP application for `mode`; `None` for stdio
pub fn http_app(
    mode: ServerMode,
    config: &RuntimeConfig,
    search: Arc<WebSearch>,
    shutdown: CancellationToken,
) -> Option<Router> {
    match mode {
        ServerMode::OpenApi => {
            if config.bearer_token.is_none() {
                tracing::warn!("API_BEARER_TOKEN is not set; the REST endpoint accepts every caller");
            }
            let auth = AuthGate::new(config.bearer_token.clone());
            Some(openapi::router(AppState::new(auth, search)))
        }
        ServerMode::Mcp(McpTransport::StreamableHttp) => Some(transport::streamable::router(
            WebSearchMcpServer::new(search),
            Some(MCP_KEEP_ALIVE),
        )),
        ServerMode::Mcp(McpTransport::Sse) => Some(transport::sse::router(
            WebSearchMcpServer::new(search),
            SseConfig {
                keep_alive: MCP_KEEP_ALIVE,
                shutdown,
            },
        )),
        ServerMode::Mcp(McpTransport::Stdio) => None,
    }
}

/// Run the selected adapter until Ctrl-C / SIGTERM
pub async fn run(mode: ServerMode, addr: SocketAddr, config: RuntimeConfig) -> Result<()> {
    let search = web_search(&config)?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    tracing::info!("Starting web search server in {} mode", mode);

    match http_app(mode, &config, search.clone(), shutdown.clone()) {
        Some(app) => serve_http(app, addr, shutdown).await,
        None => serve_stdio(WebSearchMcpServer::new(search), shutdown).await,
    }
}

async fn serve_http(app: Router, addr: SocketAddr, shutdown: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();

    tokio::select! {
        result = server => result.context("HTTP server failed")?,
        _ = async {
            shutdown.cancelled().await;
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        } => {
            tracing::warn!("Connections still open after {:?}; exiting", SHUTDOWN_GRACE);
        }
    }

    tracing::info!("Server shut down");
    Ok(())
}

async fn serve_stdio(server: WebSearchMcpServer, shutdown: CancellationToken) -> Result<()> {
    let service = server.serve(stdio()).await?;
    tracing::info!("Server running on stdio, waiting for requests...");

    tokio::select! {
        result = service.waiting() => {
            result?;
        }
        _ = shutdown.cancelled() => {}
    }

    tracing::info!("Server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
