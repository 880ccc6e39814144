//! Shared application state

use std::sync::Arc;

use crate::auth::AuthGate;
use crate::search::WebSearch;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Bearer-token gate, open when no token is configured
    pub auth: AuthGate,
    /// The search capability
    pub search: Arc<WebSearch>,
}

impl AppState {
    pub fn new(auth: AuthGate, search: Arc<WebSearch>) -> Self {
        Self { auth, search }
    }
}
