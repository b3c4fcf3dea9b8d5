//! Events API configuration.
//!
//! Built once at process start and passed down explicitly: core logic
//! never reads ambient environment state.

use crate::error::ClientError;

/// Production events endpoint, used when no override is given.
pub const DEFAULT_EVENTS_URL: &str = "https://events.lifeline-ops.dev/api/v1/events";

/// Environment variable overriding the events endpoint.
pub const EVENTS_URL_ENV: &str = "LIFELINE_EVENTS_URL";

/// Environment variable carrying the API token.
pub const API_TOKEN_ENV: &str = "LIFELINE_API_TOKEN";

/// Endpoint and credentials for the events API.
#[derive(Clone)]
pub struct ApiConfig {
    /// Events API URL.
    pub endpoint: String,
    /// Bearer token. Never logged; `Debug` redacts it.
    pub token: String,
}

impl ApiConfig {
    /// Create a config, validating that a token is present.
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ClientError::MissingToken);
        }
        Ok(ApiConfig {
            endpoint: endpoint.into(),
            token,
        })
    }

    /// Build from the process environment: endpoint from
    /// [`EVENTS_URL_ENV`] (falling back to the production URL), token from
    /// [`API_TOKEN_ENV`].
    pub fn from_env() -> Result<Self, ClientError> {
        let endpoint = std::env::var(EVENTS_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_EVENTS_URL.to_string());
        let token = std::env::var(API_TOKEN_ENV).unwrap_or_default();
        Self::new(endpoint, token)
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"***")
            .finish()
    }
}
