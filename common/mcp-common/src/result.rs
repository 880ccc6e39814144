//! Result helpers for MCP tool responses

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::{Deserialize, Serialize};

use crate::error::ToolFailure;

/// Create a successful JSON response from any serializable data
///
/// The payload is pretty-printed into a single text content item.
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Body of the text content carried by a tool error result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolErrorBody {
    /// Failure kind name, e.g. `BackendUnavailable`
    pub code: String,
    /// Human-readable explanation
    pub message: String,
}

/// Create a tool error result (`is_error = true`) from a classified failure
///
/// The result holds one text item: `{"code": ..., "message": ...}`.
pub fn tool_error<E: ToolFailure + ?Sized>(err: &E) -> CallToolResult {
    let body = ToolErrorBody {
        code: err.code().to_string(),
        message: err.message(),
    };
    // Two strings always serialize.
    let text = serde_json::to_string(&body).unwrap_or(body.message);
    CallToolResult::error(vec![Content::text(text)])
}
