//! Error taxonomy shared by every adapter
//!
//! Each adapter converts [`GatewayError`] into its own wire representation:
//! an HTTP status plus JSON body for REST and the SSE POST channel, a coded
//! tool error for MCP.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use mcp_common::ToolFailure;
use serde::Serialize;

/// Environment variable that enables the search backend
pub const BACKEND_URL_VAR: &str = "SEARXNG_BASE_URL";

/// Failures a search request can end in
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Bad or missing credential while a bearer token is configured
    #[error("Invalid or missing authentication token")]
    Unauthorized,

    /// Malformed tool input
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// No backend URL configured; permanent for the process lifetime
    #[error(
        "SearXNG search feature is not configured. Please set the {} environment variable.",
        BACKEND_URL_VAR
    )]
    BackendUnavailable,

    /// Upstream failure: transport error, timeout, non-2xx or undecodable body
    #[error("{}", backend_error_message(.status, .message))]
    BackendError {
        status: Option<u16>,
        message: String,
    },

    /// SSE POST referenced a session that does not exist (or no longer exists)
    #[error("Could not find session '{0}'")]
    SessionNotFound(String),
}

fn backend_error_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("SearXNG returned HTTP {}: {}", status, message),
        None => format!("SearXNG request failed: {}", message),
    }
}

impl GatewayError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GatewayError::InvalidParameters(message.into())
    }

    pub fn backend(status: Option<u16>, message: impl Into<String>) -> Self {
        GatewayError::BackendError {
            status,
            message: message.into(),
        }
    }

    /// Stable failure kind name, used as the error code on every transport
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Unauthorized => "Unauthorized",
            GatewayError::InvalidParameters(_) => "InvalidParameters",
            GatewayError::BackendUnavailable => "BackendUnavailable",
            GatewayError::BackendError { .. } => "BackendError",
            GatewayError::SessionNotFound(_) => "SessionNotFound",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::InvalidParameters(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::BackendError { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl ToolFailure for GatewayError {
    fn code(&self) -> &'static str {
        self.kind()
    }
}

/// JSON body of an HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.kind(),
        });

        match self {
            GatewayError::Unauthorized => {
                (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
