//! Configuration loading for web-search-server
//!
//! Configuration is read exactly once at startup, from:
//! 1. Environment variables (`API_BEARER_TOKEN`, `SEARXNG_BASE_URL`,
//!    `SEARXNG_TIMEOUT_SECS`)
//! 2. An optional TOML file (`--config` / `WEB_SEARCH_CONFIG_PATH`)
//! 3. Default values
//!
//! The resulting [`RuntimeConfig`] is immutable and handed to each component.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::tool::MAX_TIMEOUT_SECS;

pub const BEARER_TOKEN_VAR: &str = "API_BEARER_TOKEN";
pub const BASE_URL_VAR: &str = crate::error::BACKEND_URL_VAR;
pub const TIMEOUT_VAR: &str = "SEARXNG_TIMEOUT_SECS";

/// Process-wide settings, fixed for the lifetime of the process
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Bearer token for the REST adapter; `None` disables authentication
    pub bearer_token: Option<String>,
    /// SearXNG base URL; `None` disables search permanently
    pub backend_base_url: Option<Url>,
    /// Default bound on each backend call
    pub timeout: Duration,
    /// Declared default for `number_results`
    pub default_results: usize,
}

/// On-disk configuration file layout
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub searxng: SearXNGSection,
    #[serde(default)]
    pub search: SearchSection,
}

/// `[searxng]` table
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearXNGSection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<f64>,
}

/// `[search]` table
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    pub default_results: Option<usize>,
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_results() -> usize {
    5
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            backend_base_url: None,
            timeout: default_timeout(),
            default_results: default_results(),
        }
    }
}

impl RuntimeConfig {
    /// Load from the process environment and an optional config file
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            Some(path) => bail!("config file {} does not exist", path.display()),
            None => FileConfig::default(),
        };

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge file values with an environment lookup; environment wins
    pub fn resolve<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty strings count as unset
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let bearer_token = lookup(BEARER_TOKEN_VAR);

        let backend_base_url = match lookup(BASE_URL_VAR).or(file.searxng.base_url) {
            Some(raw) if !raw.trim().is_empty() => Some(parse_base_url(&raw)?),
            _ => None,
        };

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<f64>()
                    .with_context(|| format!("{} must be a number, got '{}'", TIMEOUT_VAR, raw))?,
            ),
            None => file.searxng.timeout_secs,
        };
        let timeout = match timeout {
            Some(secs) if secs > 0.0 && secs <= MAX_TIMEOUT_SECS => Duration::from_secs_f64(secs),
            Some(secs) => bail!(
                "timeout must be a positive number of seconds up to {}, got {}",
                MAX_TIMEOUT_SECS,
                secs
            ),
            None => default_timeout(),
        };

        let default_results = file.search.default_results.unwrap_or_else(default_results);
        if !(1..=crate::tool::MAX_RESULTS).contains(&default_results) {
            bail!(
                "default_results must be between 1 and {}",
                crate::tool::MAX_RESULTS
            );
        }

        Ok(Self {
            bearer_token,
            backend_base_url,
            timeout,
            default_results,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .with_context(|| format!("{} is not a valid URL: '{}'", BASE_URL_VAR, raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("{} must use http or https, got '{}'", BASE_URL_VAR, other),
    }
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("auth_enabled", &self.bearer_token.is_some())
            .field(
                "backend_base_url",
                &self.backend_base_url.as_ref().map(Url::as_str),
            )
            .field("timeout", &self.timeout)
            .field("default_results", &self.default_results)
            .finish()
    }
}
