//! Error types for the events API client.

use thiserror::Error;

/// Errors that can occur while configuring or talking to the events API.
///
/// An HTTP error *response* is not an error here: it is classified into
/// [`crate::DeliveryOutcome::Rejected`] and returned to the caller.
#[derive(Error, Debug)]
pub enum ClientError {
    /// API token absent; detected before any core logic runs.
    #[error("events API token is not set (pass --token or set {})", crate::config::API_TOKEN_ENV)]
    MissingToken,

    /// Network-level failure: DNS, connect, TLS, timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// Body could not be serialized for transmission.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
