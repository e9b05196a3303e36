//! Queue polling loop.
//!
//! Polls the ping-job queue on a fixed interval and drains every job
//! that is currently available. Claims use `FOR UPDATE SKIP LOCKED`, so
//! any number of worker processes can run this loop concurrently.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use upwatch_db::repositories::PingJobRepo;
use upwatch_db::DbPool;

use crate::executor::PingWorker;
use crate::prober::Prober;

/// Long-lived task that claims and executes ping jobs until cancelled.
pub struct WorkerRunner<P: Prober> {
    pool: DbPool,
    worker: PingWorker<P>,
    poll_interval: Duration,
}

impl<P: Prober> WorkerRunner<P> {
    pub fn new(pool: DbPool, worker: PingWorker<P>, poll_interval: Duration) -> Self {
        Self {
            pool,
            worker,
            poll_interval,
        }
    }

    /// Run the polling loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Ping worker started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Ping worker shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.drain_available().await {
                        tracing::error!(error = %e, "Queue poll failed");
                    }
                }
            }
        }
    }

    /// Claim and execute every currently available job.
    async fn drain_available(&self) -> Result<(), sqlx::Error> {
        while let Some(job) = PingJobRepo::claim_next(&self.pool, Utc::now()).await? {
            if let Err(e) = self.worker.execute(&job).await {
                // Execution faults are job-scoped; the loop keeps
                // draining and the stuck job stays visible to operators
                // as running.
                tracing::error!(
                    job_id = job.id,
                    endpoint_id = job.endpoint_id,
                    partition = %job.tenant_schema,
                    error = %e,
                    "Ping job execution failed"
                );
            }
        }
        Ok(())
    }
}
