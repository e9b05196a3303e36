//! Ping-job queue entity model.

use serde::Serialize;
use sqlx::FromRow;
use upwatch_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// A row from the control-schema `ping_jobs` queue table.
///
/// `attempt_count` is the number of deliveries so far; the queue
/// increments it at claim time, so a worker holding the job always sees
/// the current attempt number.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PingJob {
    pub id: DbId,
    pub tenant_schema: String,
    pub endpoint_id: DbId,
    pub status_id: StatusId,
    pub attempt_count: i32,
    pub enqueued_at: Timestamp,
    pub available_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub last_error: Option<String>,
}
