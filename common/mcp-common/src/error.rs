//! Error classification for MCP tool calls
//!
//! A tool call can fail in two ways. Protocol failures (unknown tool,
//! malformed JSON-RPC) are reported as `ErrorData`. Everything that happens
//! inside a tool is reported as a tool result with `is_error = true`, so the
//! session stays usable. [`ToolFailure`] describes the second kind.

/// An error that is reported to the MCP caller as a coded tool error.
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::ToolFailure;
///
/// impl ToolFailure for MyError {
///     fn code(&self) -> &'static str {
///         match self {
///             MyError::NotFound(_) => "NotFound",
///             MyError::Upstream(_) => "Upstream",
///         }
///     }
/// }
/// ```
pub trait ToolFailure: std::fmt::Display {
    /// Stable, machine-readable name of the failure kind
    fn code(&self) -> &'static str;

    /// Human-readable message. Defaults to the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }
}

impl ToolFailure for anyhow::Error {
    fn code(&self) -> &'static str {
        "InternalError"
    }
}
