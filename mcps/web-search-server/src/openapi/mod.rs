//! REST/OpenAPI adapter
//!
//! Routes:
//! - `POST /v1/<tool name>` - run a search (JSON body with the tool arguments)
//! - `GET /v1/tools` - the tool definition
//! - `GET /health` - liveness plus configuration status

pub mod api;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

/// Create the router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let search_path = format!("/v1/{}", state.search.tool().name());

    Router::new()
        .route(&search_path, post(api::search))
        .route("/v1/tools", get(api::list_tools))
        .route("/health", get(api::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
