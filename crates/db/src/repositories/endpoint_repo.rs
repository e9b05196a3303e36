//! Partition-scoped repository for per-tenant `endpoints` tables.
//!
//! Every query is schema-qualified with a validated [`TenantPartition`];
//! no statement here can span partitions. The due-claim uses
//! `SELECT FOR UPDATE SKIP LOCKED` so concurrent scheduler runs never
//! block each other and never double-claim the same endpoint.

use chrono::Duration;
use sqlx::PgPool;
use upwatch_core::tenant::TenantPartition;
use upwatch_core::types::{DbId, Timestamp};

use crate::models::endpoint::{CreateEndpoint, Endpoint};

/// Column list for `endpoints` queries.
const COLUMNS: &str = "\
    id, url, interval_minutes, last_status, \
    last_checked_at, last_latency_ms, last_enqueued_at, \
    created_at, updated_at";

/// Provides partition-scoped operations on monitored endpoints.
pub struct EndpointRepo;

impl EndpointRepo {
    /// Whether the partition's `endpoints` table has been provisioned.
    ///
    /// Readiness gate for the scheduling cycle: a tenant registered in
    /// the directory before its schema finished provisioning is skipped,
    /// not failed.
    pub async fn is_provisioned(
        pool: &PgPool,
        partition: &TenantPartition,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT to_regclass($1) IS NOT NULL")
            .bind(format!("\"{}\".endpoints", partition.as_str()))
            .fetch_one(pool)
            .await
    }

    /// Register a new monitored endpoint in the partition.
    pub async fn create(
        pool: &PgPool,
        partition: &TenantPartition,
        input: &CreateEndpoint,
    ) -> Result<Endpoint, sqlx::Error> {
        let query = format!(
            "INSERT INTO \"{schema}\".endpoints (url, interval_minutes) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}",
            schema = partition.as_str(),
        );
        sqlx::query_as::<_, Endpoint>(&query)
            .bind(&input.url)
            .bind(input.interval_minutes)
            .fetch_one(pool)
            .await
    }

    /// Find an endpoint by ID within the partition.
    pub async fn find_by_id(
        pool: &PgPool,
        partition: &TenantPartition,
        id: DbId,
    ) -> Result<Option<Endpoint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM \"{schema}\".endpoints WHERE id = $1",
            schema = partition.as_str(),
        );
        sqlx::query_as::<_, Endpoint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all endpoints in the partition.
    pub async fn list(
        pool: &PgPool,
        partition: &TenantPartition,
    ) -> Result<Vec<Endpoint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM \"{schema}\".endpoints ORDER BY id",
            schema = partition.as_str(),
        );
        sqlx::query_as::<_, Endpoint>(&query).fetch_all(pool).await
    }

    /// Delete an endpoint. Returns `false` if it was already gone.
    pub async fn delete(
        pool: &PgPool,
        partition: &TenantPartition,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM \"{schema}\".endpoints WHERE id = $1",
            schema = partition.as_str(),
        );
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically claim every due endpoint in the partition, stamping
    /// `last_enqueued_at = now` in the same statement as the selection.
    ///
    /// An endpoint is selected when its interval has elapsed since the
    /// later of its last check and its creation, unless an unexpired
    /// claim is still outstanding: `last_enqueued_at` newer than the
    /// last check and younger than the grace period. Contested rows are
    /// skipped via `FOR UPDATE SKIP LOCKED`, never waited on.
    ///
    /// Mirrors `upwatch_core::due::is_claimable`; the integration tests
    /// hold the two implementations together.
    pub async fn claim_due(
        pool: &PgPool,
        partition: &TenantPartition,
        now: Timestamp,
        grace_period: Duration,
        limit: i64,
    ) -> Result<Vec<Endpoint>, sqlx::Error> {
        let grace_cutoff = now - grace_period;
        let query = format!(
            "UPDATE \"{schema}\".endpoints \
             SET last_enqueued_at = $1, updated_at = $1 \
             WHERE id IN ( \
                 SELECT id FROM \"{schema}\".endpoints \
                 WHERE GREATEST(COALESCE(last_checked_at, created_at), created_at) \
                       + make_interval(mins => interval_minutes) <= $1 \
                   AND ( \
                       last_enqueued_at IS NULL \
                       OR (last_checked_at IS NOT NULL AND last_enqueued_at <= last_checked_at) \
                       OR last_enqueued_at <= $2 \
                   ) \
                 ORDER BY id \
                 LIMIT $3 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}",
            schema = partition.as_str(),
        );
        sqlx::query_as::<_, Endpoint>(&query)
            .bind(now)
            .bind(grace_cutoff)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Persist the outcome of one probe attempt.
    ///
    /// Returns `false` when the endpoint vanished between claim and
    /// execution — the caller treats that as a no-op, not an error.
    pub async fn record_result(
        pool: &PgPool,
        partition: &TenantPartition,
        id: DbId,
        status: &str,
        latency_ms: i32,
        checked_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE \"{schema}\".endpoints \
             SET last_status = $2, last_latency_ms = $3, \
                 last_checked_at = $4, updated_at = $4 \
             WHERE id = $1",
            schema = partition.as_str(),
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(status)
            .bind(latency_ms)
            .bind(checked_at)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
