//! Terminal-failure alert sink.
//!
//! [`DeadLetterNotifier`] is invoked exactly once per exhausted probe.
//! It records the failure at the highest log severity and publishes an
//! [`EVENT_ENDPOINT_DEAD_LETTER`] event on the bus for external delivery.
//! Neither step can fail, so emitting the alert can never fail the
//! ping task that triggered it.

use std::sync::Arc;

use upwatch_core::types::DbId;

use crate::bus::EventBus;
use crate::event::{MonitorEvent, EVENT_ENDPOINT_DEAD_LETTER};

/// Fire-and-forget alert sink for endpoints whose probes exhausted
/// their retry budget.
pub struct DeadLetterNotifier {
    bus: Arc<EventBus>,
}

impl DeadLetterNotifier {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// Raise the terminal-failure alert for one endpoint.
    pub fn notify(&self, endpoint_id: DbId, partition: &str, url: &str, error: &str) {
        tracing::error!(
            endpoint_id,
            partition,
            url,
            error,
            "Probe retries exhausted; endpoint dead-lettered"
        );

        self.bus.publish(
            MonitorEvent::new(EVENT_ENDPOINT_DEAD_LETTER)
                .with_endpoint(partition, endpoint_id)
                .with_payload(serde_json::json!({
                    "url": url,
                    "error": error,
                })),
        );
    }
}
