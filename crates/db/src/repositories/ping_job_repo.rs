//! Repository for the control-schema `ping_jobs` queue.
//!
//! This is the task-dispatcher boundary: jobs carry a worker-visible
//! attempt count, redelivery is backoff-driven via `available_at`, and
//! the attempt ceiling is enforced here rather than in the worker's
//! probe logic. Claiming uses `SELECT FOR UPDATE SKIP LOCKED` to prevent
//! double-dispatch across a horizontally scaled worker pool.

use std::time::Duration;

use sqlx::PgPool;
use upwatch_core::retry::{attempts_exhausted, backoff_delay};
use upwatch_core::tenant::TenantPartition;
use upwatch_core::types::{DbId, Timestamp};

use crate::models::ping_job::PingJob;
use crate::models::status::PingJobStatus;

/// Column list for `ping_jobs` queries.
const COLUMNS: &str = "\
    id, tenant_schema, endpoint_id, status_id, attempt_count, \
    enqueued_at, available_at, claimed_at, completed_at, last_error";

/// What the queue decided to do with a transiently failed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// The job was re-pended and becomes claimable after `delay`.
    Scheduled { delay: Duration },
    /// The attempt ceiling was reached; the job is dead-lettered.
    Exhausted,
}

/// Provides queue operations for scheduled ping jobs.
pub struct PingJobRepo;

impl PingJobRepo {
    /// Enqueue a ping job for a claimed endpoint, immediately available.
    pub async fn submit(
        pool: &PgPool,
        partition: &TenantPartition,
        endpoint_id: DbId,
        now: Timestamp,
    ) -> Result<PingJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO ping_jobs \
                 (tenant_schema, endpoint_id, status_id, enqueued_at, available_at) \
             VALUES ($1, $2, $3, $4, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PingJob>(&query)
            .bind(partition.as_str())
            .bind(endpoint_id)
            .bind(PingJobStatus::Pending.id())
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Atomically claim the next available pending job.
    ///
    /// Increments `attempt_count` as part of the claim so the worker
    /// observes the current (1-based) attempt number. Jobs whose
    /// `available_at` lies in the future are invisible — that is how
    /// backoff-driven redelivery is enforced.
    pub async fn claim_next(pool: &PgPool, now: Timestamp) -> Result<Option<PingJob>, sqlx::Error> {
        let query = format!(
            "UPDATE ping_jobs \
             SET status_id = $1, claimed_at = $2, attempt_count = attempt_count + 1 \
             WHERE id = ( \
                 SELECT id FROM ping_jobs \
                 WHERE status_id = $3 AND available_at <= $2 \
                 ORDER BY available_at, id \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PingJob>(&query)
            .bind(PingJobStatus::Running.id())
            .bind(now)
            .bind(PingJobStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Acknowledge a job whose probe produced a terminal result.
    pub async fn complete(pool: &PgPool, job_id: DbId, now: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE ping_jobs SET status_id = $2, completed_at = $3 WHERE id = $1")
            .bind(job_id)
            .bind(PingJobStatus::Completed.id())
            .bind(now)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Request redelivery of a transiently failed job.
    ///
    /// If the job's attempt count has reached `max_attempts` it is
    /// dead-lettered and [`RetryDecision::Exhausted`] is returned.
    /// Otherwise the job goes back to pending with
    /// `available_at = now + base * 2^(attempt - 1)`.
    pub async fn request_retry(
        pool: &PgPool,
        job: &PingJob,
        max_attempts: i32,
        base_delay: Duration,
        now: Timestamp,
        error: &str,
    ) -> Result<RetryDecision, sqlx::Error> {
        if attempts_exhausted(job.attempt_count, max_attempts) {
            sqlx::query(
                "UPDATE ping_jobs \
                 SET status_id = $2, completed_at = $3, last_error = $4 \
                 WHERE id = $1",
            )
            .bind(job.id)
            .bind(PingJobStatus::DeadLettered.id())
            .bind(now)
            .bind(error)
            .execute(pool)
            .await?;
            return Ok(RetryDecision::Exhausted);
        }

        let delay = backoff_delay(base_delay, job.attempt_count);
        let available_at = now + chrono::Duration::seconds(delay.as_secs() as i64);
        sqlx::query(
            "UPDATE ping_jobs \
             SET status_id = $2, available_at = $3, claimed_at = NULL, last_error = $4 \
             WHERE id = $1",
        )
        .bind(job.id)
        .bind(PingJobStatus::Pending.id())
        .bind(available_at)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(RetryDecision::Scheduled { delay })
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PingJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ping_jobs WHERE id = $1");
        sqlx::query_as::<_, PingJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
