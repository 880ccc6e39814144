//! HTTP transports for the MCP server
//!
//! - [`streamable`] - MCP Streamable HTTP on a single endpoint, sessions
//!   handled by rmcp
//! - [`sse`] - the SSE transport: a long-lived event stream per client plus a
//!   POST channel correlated by `session_id`

pub mod sse;
pub mod streamable;

pub use sse::SseConfig;
