//! MCP Common - Shared utilities for MCP servers
//!
//! - **Initialization**: [`init_tracing`] for stderr-only logging
//! - **Results**: helpers for building `CallToolResult` payloads
//! - **Errors**: [`ToolFailure`] for errors that surface as coded tool errors
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{json_success, tool_error};
//!
//! fn my_tool(&self) -> Result<CallToolResult, McpError> {
//!     match do_work() {
//!         Ok(data) => json_success(&data),
//!         Err(e) => Ok(tool_error(&e)),
//!     }
//! }
//! ```

pub mod error;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use error::ToolFailure;
pub use init::{init_tracing, LogFormat};
pub use result::{json_success, tool_error, ToolErrorBody};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};
