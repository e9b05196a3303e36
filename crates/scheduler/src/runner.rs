//! Periodic scheduling loop.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::cycle::SchedulerCycle;

/// Long-lived task that runs one [`SchedulerCycle`] per tick until the
/// cancellation token is triggered.
pub struct SchedulerRunner {
    cycle: SchedulerCycle,
    interval: Duration,
}

impl SchedulerRunner {
    pub fn new(cycle: SchedulerCycle, interval: Duration) -> Self {
        Self { cycle, interval }
    }

    /// Run the scheduling loop until `cancel` is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Scheduler started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.cycle.run_cycle(Utc::now()).await {
                        tracing::error!(error = %e, "Scheduling cycle failed");
                    }
                }
            }
        }
    }
}
