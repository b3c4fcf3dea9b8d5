//! Structured observability hooks for the event forwarding lifecycle.
//!
//! Emission functions for the key moments: catalog match, body
//! construction, delivery outcome. Events are emitted at `info!` level
//! through the subscriber installed by [`crate::telemetry::init_tracing`].

use tracing::info;

/// Emit event: a catalog definition matched the context.
pub fn emit_event_matched(name: &str) {
    info!(event = "catalog.matched", name = %name);
}

/// Emit event: body constructed, with the source that produced it
/// (`explicit`, `catalog`, or `passthrough`).
pub fn emit_body_constructed(source: &str, stage: Option<&str>, status: Option<&str>) {
    info!(
        event = "body.constructed",
        source = %source,
        stage = stage.unwrap_or(""),
        status = status.unwrap_or(""),
    );
}

/// Emit event: the events endpoint accepted the delivery.
pub fn emit_delivery_accepted(endpoint: &str) {
    info!(event = "delivery.accepted", endpoint = %endpoint);
}

/// Emit event: the events endpoint rejected the delivery (warning level).
pub fn emit_delivery_rejected(endpoint: &str, status: u16, status_text: &str) {
    tracing::warn!(
        event = "delivery.rejected",
        endpoint = %endpoint,
        http_status = status,
        http_status_text = %status_text,
    );
}
