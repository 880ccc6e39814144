//! REST API handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;

use super::state::AppState;
use crate::error::GatewayError;
use crate::tool::{JsonObject, ToolDefinition};
use crate::types::SearchResult;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: String,
    pub backend_configured: bool,
    pub auth_enabled: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = state.search.backend();
    Json(HealthResponse {
        status: "ok",
        backend: backend.name().to_string(),
        backend_configured: backend.is_available(),
        auth_enabled: state.auth.is_enabled(),
    })
}

/// List the tools served by this endpoint
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    Json(vec![state.search.tool().clone()])
}

/// Run a search
///
/// Auth runs before the body is looked at, so an unauthenticated caller
/// learns nothing about parameter validation.
pub async fn search(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    body: Result<Json<JsonObject>, JsonRejection>,
) -> Result<Json<Vec<SearchResult>>, GatewayError> {
    let credential = bearer.as_ref().map(|TypedHeader(auth)| auth.token());
    state.auth.check(credential)?;

    let Json(raw) = body.map_err(|e| GatewayError::invalid(e.body_text()))?;

    let results = state.search.call(&raw).await?;
    Ok(Json(results))
}
