//! Web Search Server
//!
//! Serves SearXNG web search as a REST endpoint or an MCP tool.
//!
//! # Configuration
//! Set `SEARXNG_BASE_URL` and optionally `API_BEARER_TOKEN`, or configure
//! `[searxng]` in the file given by `--config` / `WEB_SEARCH_CONFIG_PATH`.

use anyhow::Result;
use clap::Parser;
use mcp_common::LogFormat;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use web_search_server::bootstrap::{self, McpTransport, Mode, ServerMode};
use web_search_server::config::RuntimeConfig;

#[derive(Parser)]
#[command(name = "web-search-server")]
#[command(about = "SearXNG web search over OpenAPI or MCP")]
#[command(version)]
struct Cli {
    /// Host to bind the server to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to bind the server to
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Server mode
    #[arg(long, value_enum, default_value_t = Mode::Openapi)]
    mode: Mode,

    /// MCP transport (only used in mcp mode)
    #[arg(long, value_enum, default_value_t = McpTransport::StreamableHttp)]
    mcp_mode: McpTransport,

    /// Optional TOML configuration file
    #[arg(long, env = "WEB_SEARCH_CONFIG_PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    mcp_common::init_tracing(&["web_search_server", "mcp_common"], LogFormat::from_env())?;

    let config = RuntimeConfig::load(cli.config.as_deref())?;
    tracing::info!(?config, "Configuration loaded");

    let mode = ServerMode::new(cli.mode, cli.mcp_mode);
    if cli.mode == Mode::Openapi && cli.mcp_mode != McpTransport::StreamableHttp {
        tracing::warn!("--mcp-mode is ignored in openapi mode");
    }

    bootstrap::run(mode, SocketAddr::new(cli.host, cli.port), config).await
}
