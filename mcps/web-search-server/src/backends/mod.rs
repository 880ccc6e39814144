//! Search backend implementations
//!
//! Adapters only see the [`SearchBackend`] trait; SearXNG is the only
//! production implementation.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::types::{SearchQuery, SearchResult};

pub mod searxng;

pub use searxng::SearXNGBackend;

/// Trait for search backends
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &str;

    /// Check if this backend is configured. An unavailable backend must not
    /// be asked to search.
    fn is_available(&self) -> bool;

    /// Run one search. Results keep the order the backend returned.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, GatewayError>;
}
