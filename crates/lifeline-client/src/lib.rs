//! Lifeline events API client.
//!
//! Serializes a [`EventBody`], attaches bearer-token auth, issues the POST,
//! and classifies the HTTP response: status < 400 is [`DeliveryOutcome::Accepted`]
//! with the parsed response body, status >= 400 is [`DeliveryOutcome::Rejected`],
//! returned rather than raised. Only network-level failures surface as
//! [`ClientError::Transport`]. No retries: one delivery report per
//! invocation.

pub mod config;
pub mod error;
pub mod fakes;

pub use config::{ApiConfig, API_TOKEN_ENV, DEFAULT_EVENTS_URL, EVENTS_URL_ENV};
pub use error::ClientError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use lifeline_core::{obs, EventBody};

/// Marker header identifying the delivery mechanism to the API.
pub const MECHANISM_HEADER: &str = "x-lifeline-mechanism";

/// What the events endpoint made of a delivery.
///
/// Order matters for deserialization: the rejected shape is tried first,
/// since `Accepted` swallows any JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeliveryOutcome {
    /// Status >= 400. Serializes as
    /// `{"HTTPErrorStatus": <status>, "HTTPErrorStatusText": <text>}`.
    Rejected {
        #[serde(rename = "HTTPErrorStatus")]
        status: u16,
        #[serde(rename = "HTTPErrorStatusText")]
        status_text: String,
    },
    /// Status < 400, with the response body parsed as JSON (`null` when the
    /// body is empty or not JSON).
    Accepted(Value),
}

impl DeliveryOutcome {
    /// Whether the endpoint accepted the event.
    pub fn is_accepted(&self) -> bool {
        matches!(self, DeliveryOutcome::Accepted(_))
    }
}

/// Classify an HTTP response into a delivery outcome.
pub fn classify_response(status: u16, status_text: &str, body: &str) -> DeliveryOutcome {
    if status >= 400 {
        DeliveryOutcome::Rejected {
            status,
            status_text: status_text.to_string(),
        }
    } else {
        DeliveryOutcome::Accepted(serde_json::from_str(body).unwrap_or(Value::Null))
    }
}

/// Seam between orchestration and transport. The CLI talks to this trait;
/// tests substitute fakes from [`fakes`].
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event body, reporting the endpoint's verdict.
    async fn deliver(&self, body: &EventBody) -> Result<DeliveryOutcome, ClientError>;
}

/// reqwest-backed client for the events API.
pub struct EventsClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl EventsClient {
    /// Create a client for the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("lifeline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(EventsClient { config, http })
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl EventSink for EventsClient {
    async fn deliver(&self, body: &EventBody) -> Result<DeliveryOutcome, ClientError> {
        debug!(endpoint = %self.config.endpoint, "posting event");

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.token)
            .header(MECHANISM_HEADER, "cli")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        let text = response.text().await?;

        let outcome = classify_response(status.as_u16(), &status_text, &text);
        match &outcome {
            DeliveryOutcome::Accepted(_) => obs::emit_delivery_accepted(&self.config.endpoint),
            DeliveryOutcome::Rejected {
                status,
                status_text,
            } => obs::emit_delivery_rejected(&self.config.endpoint, *status, status_text),
        }
        Ok(outcome)
    }
}
