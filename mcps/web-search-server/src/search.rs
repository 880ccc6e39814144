//! The search capability shared by every protocol adapter
//!
//! [`WebSearch`] ties the tool definition to a backend: validate the raw
//! arguments, refuse early when no backend is configured, then make exactly
//! one backend call. There is no retry.

use std::sync::Arc;

use crate::backends::SearchBackend;
use crate::error::GatewayError;
use crate::tool::{JsonObject, ToolDefinition};
use crate::types::SearchResult;

#[derive(Clone)]
pub struct WebSearch {
    tool: Arc<ToolDefinition>,
    backend: Arc<dyn SearchBackend>,
}

impl WebSearch {
    pub fn new(tool: Arc<ToolDefinition>, backend: Arc<dyn SearchBackend>) -> Self {
        if !backend.is_available() {
            tracing::warn!(
                "Backend '{}' is not configured; every search will fail until {} is set",
                backend.name(),
                crate::error::BACKEND_URL_VAR
            );
        }
        Self { tool, backend }
    }

    pub fn tool(&self) -> &ToolDefinition {
        &self.tool
    }

    pub fn backend(&self) -> &dyn SearchBackend {
        self.backend.as_ref()
    }

    /// Validate `raw` and run the search
    pub async fn call(&self, raw: &JsonObject) -> Result<Vec<SearchResult>, GatewayError> {
        let query = self.tool.validate(raw)?;

        if !self.backend.is_available() {
            return Err(GatewayError::BackendUnavailable);
        }

        tracing::debug!(
            term = %query.term,
            number_results = query.number_results,
            filters = query.filters.len(),
            "Searching"
        );

        self.backend.search(&query).await.inspect_err(|e| {
            tracing::warn!(kind = e.kind(), "Search for '{}' failed: {}", query.term, e);
        })
    }
}
