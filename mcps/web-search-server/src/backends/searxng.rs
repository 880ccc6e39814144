//! SearXNG backend
//!
//! Implements the SearchBackend trait using a SearXNG instance's JSON API.
//! See: https://docs.searxng.org/dev/search_api.html

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use url::Url;

use super::SearchBackend;
use crate::config::RuntimeConfig;
use crate::error::GatewayError;
use crate::types::{SearchQuery, SearchResult};

/// Parameters the backend sets itself; filters cannot override them
const RESERVED_PARAMS: &[&str] = &["q", "format"];

/// Upstream bodies embedded in errors are cut to this many bytes
const MAX_ERROR_BODY: usize = 512;

/// SearXNG backend
pub struct SearXNGBackend {
    client: Client,
    base_url: Option<Url>,
    timeout: Duration,
}

impl SearXNGBackend {
    pub fn new(base_url: Option<Url>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("web-search-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &RuntimeConfig) -> anyhow::Result<Self> {
        Self::new(config.backend_base_url.clone(), config.timeout)
    }

    fn search_url(base: &Url) -> String {
        format!("{}/search", base.as_str().trim_end_matches('/'))
    }
}

// SearXNG API response types
#[derive(Debug, Deserialize)]
struct SearXNGResponse {
    results: Vec<SearXNGResult>,
}

#[derive(Debug, Deserialize)]
struct SearXNGResult {
    #[serde(default)]
    title: String,
    url: String,
    content: Option<String>,
}

impl From<SearXNGResult> for SearchResult {
    fn from(r: SearXNGResult) -> Self {
        SearchResult {
            title: r.title,
            url: r.url,
            snippet: r.content.unwrap_or_default(),
        }
    }
}

fn truncate(mut text: String) -> String {
    if text.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> GatewayError {
    if err.is_timeout() {
        GatewayError::backend(None, format!("timed out after {:.1}s", timeout.as_secs_f64()))
    } else {
        GatewayError::backend(err.status().map(|s| s.as_u16()), err.to_string())
    }
}

#[async_trait]
impl SearchBackend for SearXNGBackend {
    fn name(&self) -> &str {
        "searxng"
    }

    fn is_available(&self) -> bool {
        self.base_url.is_some()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, GatewayError> {
        let base = self
            .base_url
            .as_ref()
            .ok_or(GatewayError::BackendUnavailable)?;
        let timeout = query.timeout.unwrap_or(self.timeout);

        let mut params: Vec<(&str, &str)> = vec![("q", query.term.as_str()), ("format", "json")];
        for (key, value) in &query.filters {
            if RESERVED_PARAMS.contains(&key.as_str()) {
                tracing::debug!("Dropping reserved filter '{}'", key);
                continue;
            }
            params.push((key.as_str(), value.as_str()));
        }

        let started = Instant::now();
        let response = self
            .client
            .get(Self::search_url(base))
            .query(&params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("error").to_string()
            } else {
                truncate(text)
            };
            tracing::warn!("SearXNG returned {} for '{}'", status, query.term);
            return Err(GatewayError::backend(Some(status.as_u16()), message));
        }

        let status = response.status().as_u16();
        let body: SearXNGResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e, timeout)
            } else {
                GatewayError::backend(Some(status), format!("malformed response: {}", e))
            }
        })?;

        let results: Vec<SearchResult> = body
            .results
            .into_iter()
            .take(query.number_results)
            .map(SearchResult::from)
            .collect();

        tracing::info!(
            term = %query.term,
            results = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "SearXNG search completed"
        );

        Ok(results)
    }
}
