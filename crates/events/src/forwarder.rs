//! Bus-to-webhook alert forwarding.
//!
//! [`AlertForwarder`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and pushes dead-letter events to a configured webhook URL. It runs as
//! a long-lived background task and shuts down gracefully when the bus
//! sender is dropped. Delivery failures are logged and contained — an
//! unreachable alert channel never affects the probe pipeline.

use tokio::sync::broadcast;

use crate::delivery::webhook::WebhookDelivery;
use crate::event::{MonitorEvent, EVENT_ENDPOINT_DEAD_LETTER};

/// Background service that forwards dead-letter alerts to a webhook.
pub struct AlertForwarder {
    url: String,
    delivery: WebhookDelivery,
}

impl AlertForwarder {
    pub fn new(url: String) -> Self {
        Self {
            url,
            delivery: WebhookDelivery::new(),
        }
    }

    /// Whether an event is one this forwarder delivers.
    fn wants(event: &MonitorEvent) -> bool {
        event.event_type == EVENT_ENDPOINT_DEAD_LETTER
    }

    /// Run the forwarding loop.
    ///
    /// Exits when the channel is closed (i.e. the bus is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<MonitorEvent>) {
        tracing::info!(url = %self.url, "Alert forwarder started");

        loop {
            match receiver.recv().await {
                Ok(event) if Self::wants(&event) => {
                    if let Err(e) = self.delivery.deliver(&self.url, &event).await {
                        tracing::error!(
                            error = %e,
                            endpoint_id = event.endpoint_id,
                            "Failed to forward dead-letter alert"
                        );
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Alert forwarder lagged, events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, alert forwarder shutting down");
                    break;
                }
            }
        }
    }
}
