//! MCP Server implementation for web search
//!
//! One handler serves every MCP transport (streamable HTTP, SSE, stdio).
//! The tool list is rendered from the shared [`ToolDefinition`] instead of
//! the `#[tool]` macros so MCP discovery, REST and validation all read the
//! same description.
//!
//! MCP calls do not pass through the bearer-token gate: MCP mode runs
//! without per-call credentials.
//!
//! [`ToolDefinition`]: crate::tool::ToolDefinition

use mcp_common::{json_success, tool_error};
use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    ErrorData as McpError, ServerHandler,
};
use std::sync::Arc;

use crate::search::WebSearch;

/// The Web Search MCP Server
#[derive(Clone)]
pub struct WebSearchMcpServer {
    search: Arc<WebSearch>,
}

impl WebSearchMcpServer {
    pub fn new(search: Arc<WebSearch>) -> Self {
        Self { search }
    }
}

impl ServerHandler for WebSearchMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Web Search MCP Server - searches the web through a SearXNG \
                 meta-search instance. Call the search tool with a 'term'."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: vec![self.search.tool().to_mcp_tool()],
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if request.name != self.search.tool().name() {
            return Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ));
        }

        let raw = request.arguments.unwrap_or_default();

        // The token fires when the client cancels or the session goes away;
        // dropping the search future abandons the backend request.
        tokio::select! {
            outcome = self.search.call(&raw) => match outcome {
                Ok(results) => json_success(&results),
                Err(e) => Ok(tool_error(&e)),
            },
            _ = context.ct.cancelled() => {
                tracing::info!("Tool call cancelled before the backend answered");
                Err(McpError::internal_error("request cancelled", None))
            }
        }
    }
}
