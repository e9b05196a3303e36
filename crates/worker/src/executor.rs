//! Ping job execution.

use std::time::Duration;

use chrono::Utc;
use upwatch_core::error::CoreError;
use upwatch_core::tenant::TenantPartition;
use upwatch_db::models::ping_job::PingJob;
use upwatch_db::repositories::{EndpointRepo, PingJobRepo, RetryDecision};
use upwatch_db::DbPool;
use upwatch_events::DeadLetterNotifier;

use crate::config::WorkerConfig;
use crate::prober::Prober;

/// Error type for job execution.
///
/// Only infrastructure faults surface here; probe failures are ordinary
/// outcomes, not errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The job referenced an invalid tenant partition.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// How one job execution concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The probe produced a terminal result (success or HTTP error).
    Completed,
    /// A transient failure; the queue will redeliver after `delay`.
    Retrying { delay: Duration },
    /// Retries exhausted; the dead-letter alert was emitted.
    DeadLettered,
    /// The endpoint was deleted between claim and execution.
    Vanished,
}

/// Executes one ping job: resolve the endpoint, probe it, persist the
/// outcome, and decide between completion, redelivery, and dead-letter.
pub struct PingWorker<P: Prober> {
    pool: DbPool,
    prober: P,
    notifier: DeadLetterNotifier,
    max_attempts: i32,
    retry_base_delay: Duration,
}

impl<P: Prober> PingWorker<P> {
    pub fn new(pool: DbPool, prober: P, notifier: DeadLetterNotifier, config: &WorkerConfig) -> Self {
        Self {
            pool,
            prober,
            notifier,
            max_attempts: config.max_attempts,
            retry_base_delay: Duration::from_secs(config.retry_base_delay_secs),
        }
    }

    /// Execute one claimed job.
    pub async fn execute(&self, job: &PingJob) -> Result<ExecutionOutcome, WorkerError> {
        let partition = TenantPartition::new(&job.tenant_schema)?;

        let Some(endpoint) =
            EndpointRepo::find_by_id(&self.pool, &partition, job.endpoint_id).await?
        else {
            // Deleted between claim and execution: an ordinary no-op.
            tracing::info!(
                job_id = job.id,
                endpoint_id = job.endpoint_id,
                partition = %partition,
                "Endpoint vanished before probe, acking job"
            );
            PingJobRepo::complete(&self.pool, job.id, Utc::now()).await?;
            return Ok(ExecutionOutcome::Vanished);
        };

        let report = self.prober.probe(&endpoint.url).await;
        let status = report.outcome.status_label();
        let checked_at = Utc::now();

        // Persist before any retry decision: every attempt, transient or
        // not, must leave the latest status/latency on the endpoint row.
        let recorded = EndpointRepo::record_result(
            &self.pool,
            &partition,
            endpoint.id,
            &status,
            report.latency_ms,
            checked_at,
        )
        .await?;
        if !recorded {
            tracing::info!(
                job_id = job.id,
                endpoint_id = endpoint.id,
                partition = %partition,
                "Endpoint vanished during probe, result dropped"
            );
        }

        if report.outcome.is_retryable() {
            let error = status.clone();
            let decision = PingJobRepo::request_retry(
                &self.pool,
                job,
                self.max_attempts,
                self.retry_base_delay,
                checked_at,
                &error,
            )
            .await?;

            return match decision {
                RetryDecision::Scheduled { delay } => {
                    tracing::warn!(
                        job_id = job.id,
                        endpoint_id = endpoint.id,
                        partition = %partition,
                        url = %endpoint.url,
                        attempt = job.attempt_count,
                        retry_in_secs = delay.as_secs(),
                        "Probe failed with network error, redelivery scheduled"
                    );
                    Ok(ExecutionOutcome::Retrying { delay })
                }
                RetryDecision::Exhausted => {
                    self.notifier.notify(
                        endpoint.id,
                        partition.as_str(),
                        &endpoint.url,
                        &error,
                    );
                    Ok(ExecutionOutcome::DeadLettered)
                }
            };
        }

        PingJobRepo::complete(&self.pool, job.id, checked_at).await?;
        tracing::debug!(
            job_id = job.id,
            endpoint_id = endpoint.id,
            partition = %partition,
            status = %status,
            latency_ms = report.latency_ms,
            "Probe recorded"
        );
        Ok(ExecutionOutcome::Completed)
    }
}
