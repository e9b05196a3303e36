//! Monitored-endpoint entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upwatch_core::types::{DbId, Timestamp};

/// A row from a tenant partition's `endpoints` table.
///
/// `last_enqueued_at` is written only by the scanner at claim time;
/// `last_status` / `last_checked_at` / `last_latency_ms` only by the
/// worker after a probe.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Endpoint {
    pub id: DbId,
    pub url: String,
    pub interval_minutes: i32,
    pub last_status: String,
    pub last_checked_at: Option<Timestamp>,
    pub last_latency_ms: Option<i32>,
    pub last_enqueued_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new monitored endpoint.
#[derive(Debug, Deserialize)]
pub struct CreateEndpoint {
    pub url: String,
    pub interval_minutes: i32,
}
