//! Per-partition due-endpoint scanning.

use chrono::Duration;
use upwatch_core::due::{due_at, schedule_lag_ms};
use upwatch_core::tenant::TenantPartition;
use upwatch_core::types::Timestamp;
use upwatch_db::models::endpoint::Endpoint;
use upwatch_db::repositories::EndpointRepo;
use upwatch_db::DbPool;

/// Scans one tenant partition for endpoints whose check interval has
/// elapsed and claims them for dispatch.
///
/// The claim itself is a single non-blocking, conflict-skipping statement
/// (see [`EndpointRepo::claim_due`]); concurrent scheduler runs skip each
/// other's rows instead of waiting, and the grace period keeps a claimed
/// endpoint out of subsequent scans while its probe is in flight.
pub struct DueEndpointScanner {
    grace_period: Duration,
    batch_limit: i64,
}

impl DueEndpointScanner {
    pub fn new(grace_period: Duration, batch_limit: i64) -> Self {
        Self {
            grace_period,
            batch_limit,
        }
    }

    /// Claim every due endpoint in the partition at `now`.
    pub async fn scan(
        &self,
        pool: &DbPool,
        partition: &TenantPartition,
        now: Timestamp,
    ) -> Result<Vec<Endpoint>, sqlx::Error> {
        let claimed =
            EndpointRepo::claim_due(pool, partition, now, self.grace_period, self.batch_limit)
                .await?;

        for endpoint in &claimed {
            // Scheduling lag: how far past its due instant the endpoint
            // was picked up. The claim only stamped last_enqueued_at, so
            // the due baseline fields are still the pre-claim values.
            let due = due_at(
                endpoint.created_at,
                endpoint.last_checked_at,
                endpoint.interval_minutes,
            );
            tracing::debug!(
                endpoint_id = endpoint.id,
                partition = %partition,
                url = %endpoint.url,
                lag_ms = schedule_lag_ms(now, due),
                "Endpoint claimed for probing"
            );
        }

        Ok(claimed)
    }
}
