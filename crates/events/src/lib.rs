//! upwatch monitoring events and alerting.
//!
//! - [`MonitorEvent`] — the canonical monitoring event envelope.
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DeadLetterNotifier`] — terminal-failure alert sink for exhausted
//!   probe retries.
//! - [`delivery`] — external alert delivery (webhook).
//! - [`AlertForwarder`] — background task forwarding dead-letter events
//!   to a configured webhook.

pub mod bus;
pub mod dead_letter;
pub mod delivery;
pub mod event;
pub mod forwarder;

pub use bus::EventBus;
pub use dead_letter::DeadLetterNotifier;
pub use delivery::webhook::WebhookDelivery;
pub use event::{MonitorEvent, EVENT_ENDPOINT_DEAD_LETTER};
pub use forwarder::AlertForwarder;
