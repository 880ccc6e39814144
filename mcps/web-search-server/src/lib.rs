//! Web Search Server Library
//!
//! Web search via a SearXNG meta-search instance, exposed as either:
//! - a REST endpoint (`openapi` mode), guarded by an optional bearer token
//! - an MCP tool over Streamable HTTP, SSE or stdio (`mcp` mode)
//!
//! All adapters share one [`tool::ToolDefinition`] and one
//! [`search::WebSearch`].
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use web_search_server::{bootstrap, config::RuntimeConfig};
//!
//! let config = RuntimeConfig::load(None)?;
//! let search = bootstrap::web_search(&config)?;
//! let results = search.call(&args).await?;
//! ```
//!
//! # Configuration
//! Set `SEARXNG_BASE_URL` (and optionally `API_BEARER_TOKEN`), or point
//! `WEB_SEARCH_CONFIG_PATH` at a TOML file.

pub mod auth;
pub mod backends;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod openapi;
pub mod search;
pub mod server;
pub mod tool;
pub mod transport;
pub mod types;

pub use error::GatewayError;
pub use search::WebSearch;
pub use server::WebSearchMcpServer;
pub use types::{SearchQuery, SearchResult};
