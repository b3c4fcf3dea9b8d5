//! In-memory sink fakes for exercising delivery handling without a network.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use lifeline_core::EventBody;

use crate::{ClientError, DeliveryOutcome, EventSink};

/// An [`EventSink`] that records every delivered body and returns a fixed
/// outcome.
pub struct StaticSink {
    outcome: DeliveryOutcome,
    deliveries: Mutex<Vec<EventBody>>,
}

impl StaticSink {
    /// A sink whose endpoint accepts everything with `response`.
    pub fn accepting(response: Value) -> Self {
        Self {
            outcome: DeliveryOutcome::Accepted(response),
            deliveries: Mutex::new(Vec::new()),
        }
    }

    /// A sink whose endpoint rejects everything with the given HTTP status.
    pub fn rejecting(status: u16, status_text: &str) -> Self {
        Self {
            outcome: DeliveryOutcome::Rejected {
                status,
                status_text: status_text.to_string(),
            },
            deliveries: Mutex::new(Vec::new()),
        }
    }

    /// Bodies delivered so far, in order.
    pub fn deliveries(&self) -> Vec<EventBody> {
        self.deliveries.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl EventSink for StaticSink {
    async fn deliver(&self, body: &EventBody) -> Result<DeliveryOutcome, ClientError> {
        self.deliveries
            .lock()
            .expect("sink lock poisoned")
            .push(body.clone());
        Ok(self.outcome.clone())
    }
}

/// An [`EventSink`] that fails at the transport level, for exercising the
/// network-error path.
pub struct FailingSink;

#[async_trait]
impl EventSink for FailingSink {
    async fn deliver(&self, _body: &EventBody) -> Result<DeliveryOutcome, ClientError> {
        Err(ClientError::Transport("connection refused".to_string()))
    }
}
