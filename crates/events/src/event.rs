//! Monitoring event envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use upwatch_core::types::DbId;

/// Event emitted when a probe exhausts its retries.
pub const EVENT_ENDPOINT_DEAD_LETTER: &str = "endpoint.dead_letter";

/// A monitoring event.
///
/// Constructed via [`MonitorEvent::new`] and enriched with
/// [`with_endpoint`](MonitorEvent::with_endpoint) and
/// [`with_payload`](MonitorEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorEvent {
    /// Dot-separated event name, e.g. `"endpoint.dead_letter"`.
    pub event_type: String,

    /// Tenant partition the event originated from.
    pub tenant: Option<String>,

    /// Database id of the endpoint involved.
    pub endpoint_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl MonitorEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            tenant: None,
            endpoint_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the originating endpoint to the event.
    pub fn with_endpoint(mut self, tenant: impl Into<String>, endpoint_id: DbId) -> Self {
        self.tenant = Some(tenant.into());
        self.endpoint_id = Some(endpoint_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_event_has_empty_optional_fields() {
        let event = MonitorEvent::new("bare.event");
        assert_eq!(event.event_type, "bare.event");
        assert!(event.tenant.is_none());
        assert!(event.endpoint_id.is_none());
        assert!(event.payload.is_object());
    }

    #[test]
    fn builders_attach_context() {
        let event = MonitorEvent::new(EVENT_ENDPOINT_DEAD_LETTER)
            .with_endpoint("acme", 7)
            .with_payload(serde_json::json!({"url": "https://x.example"}));
        assert_eq!(event.tenant.as_deref(), Some("acme"));
        assert_eq!(event.endpoint_id, Some(7));
        assert_eq!(event.payload["url"], "https://x.example");
    }
}
