//! Bearer-token gate for the REST adapter
//!
//! With no token configured the gate accepts every request, including ones
//! without an `Authorization` header, so unconfigured deployments are
//! unauthenticated.

use crate::error::GatewayError;

/// Outcome of a successful check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthContext {
    /// The supplied credential matched the configured token
    Authenticated,
    /// No token is configured, so nothing was checked
    Anonymous,
}

/// Validates inbound credentials against the configured bearer token
#[derive(Clone, Default)]
pub struct AuthGate {
    token: Option<String>,
}

impl AuthGate {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Whether a token is configured
    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    /// Check a credential. Comparison is exact: case-sensitive, no trimming.
    pub fn check(&self, provided: Option<&str>) -> Result<AuthContext, GatewayError> {
        match (&self.token, provided) {
            (None, _) => Ok(AuthContext::Anonymous),
            (Some(expected), Some(given)) if expected.as_str() == given => {
                Ok(AuthContext::Authenticated)
            }
            (Some(_), _) => Err(GatewayError::Unauthorized),
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
