//! Search request and result types
//!
//! These are the transport-independent values passed between the tool
//! definition, the backend and the protocol adapters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// A validated search request, built per call and discarded afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// The search term, trimmed and non-empty
    pub term: String,
    /// Maximum number of results to return
    pub number_results: usize,
    /// Per-call override of the backend timeout
    pub timeout: Option<Duration>,
    /// Engine-specific filters passed through to the backend untouched
    pub filters: BTreeMap<String, String>,
}

/// A single web search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result
    pub title: String,
    /// The URL of the result
    pub url: String,
    /// A description or snippet of the result
    pub snippet: String,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}
