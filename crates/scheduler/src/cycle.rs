//! One scheduling cycle across all tenant partitions.

use chrono::Duration;
use serde::Serialize;
use upwatch_core::tenant::TenantPartition;
use upwatch_core::types::Timestamp;
use upwatch_db::repositories::{EndpointRepo, PingJobRepo, TenantRepo};
use upwatch_db::DbPool;
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::scanner::DueEndpointScanner;

/// Outcome summary of one scheduling cycle.
#[derive(Debug, Default, Serialize)]
pub struct CycleReport {
    /// Number of tenant partitions visited.
    pub partitions_seen: usize,
    /// Total ping jobs submitted across all partitions.
    pub scheduled: usize,
    /// Partitions skipped because their endpoint storage is not
    /// provisioned yet.
    pub skipped_partitions: Vec<String>,
    /// Partitions whose scan failed; the failure never aborts the cycle.
    pub failed_partitions: Vec<String>,
}

/// What happened to a single partition within a cycle.
enum PartitionOutcome {
    Skipped,
    Scheduled(usize),
}

/// Iterates every active tenant partition once, claiming due endpoints
/// and submitting one ping job per claim.
///
/// Safe to invoke repeatedly and concurrently: claims are non-blocking
/// and the grace period makes rapid re-invocation idempotent per
/// endpoint.
pub struct SchedulerCycle {
    pool: DbPool,
    scanner: DueEndpointScanner,
}

impl SchedulerCycle {
    pub fn new(pool: DbPool, config: &SchedulerConfig) -> Self {
        let scanner = DueEndpointScanner::new(
            Duration::seconds(config.grace_period_secs as i64),
            config.claim_batch_limit,
        );
        Self { pool, scanner }
    }

    /// Run one cycle at `now` over all active tenants.
    ///
    /// Only directory-level failures (listing tenants) surface as `Err`;
    /// anything scoped to a single partition is contained and reported
    /// in the [`CycleReport`].
    pub async fn run_cycle(&self, now: Timestamp) -> Result<CycleReport, sqlx::Error> {
        let cycle_id = Uuid::new_v4();
        let tenants = TenantRepo::list_active(&self.pool).await?;

        let mut report = CycleReport::default();

        for tenant in &tenants {
            report.partitions_seen += 1;

            let partition = match TenantPartition::new(&tenant.schema_name) {
                Ok(p) => p,
                Err(e) => {
                    // A registry row that fails identifier validation is a
                    // partition-scoped fault, not a cycle-scoped one.
                    tracing::error!(
                        %cycle_id,
                        tenant_id = tenant.id,
                        schema_name = %tenant.schema_name,
                        error = %e,
                        "Invalid partition name in tenant registry"
                    );
                    report.failed_partitions.push(tenant.schema_name.clone());
                    continue;
                }
            };

            match self.schedule_partition(&partition, now).await {
                Ok(PartitionOutcome::Skipped) => {
                    tracing::warn!(
                        %cycle_id,
                        partition = %partition,
                        "Partition endpoint storage not provisioned, skipping"
                    );
                    report.skipped_partitions.push(partition.as_str().to_string());
                }
                Ok(PartitionOutcome::Scheduled(count)) => {
                    report.scheduled += count;
                }
                Err(e) => {
                    tracing::error!(
                        %cycle_id,
                        partition = %partition,
                        error = %e,
                        "Partition scan failed"
                    );
                    report.failed_partitions.push(partition.as_str().to_string());
                }
            }
        }

        tracing::info!(
            %cycle_id,
            partitions_seen = report.partitions_seen,
            scheduled = report.scheduled,
            skipped = report.skipped_partitions.len(),
            failed = report.failed_partitions.len(),
            "Scheduling cycle complete"
        );

        Ok(report)
    }

    /// Scan and dispatch one partition.
    async fn schedule_partition(
        &self,
        partition: &TenantPartition,
        now: Timestamp,
    ) -> Result<PartitionOutcome, sqlx::Error> {
        if !EndpointRepo::is_provisioned(&self.pool, partition).await? {
            return Ok(PartitionOutcome::Skipped);
        }

        let claimed = self.scanner.scan(&self.pool, partition, now).await?;

        let mut submitted = 0;
        for endpoint in &claimed {
            PingJobRepo::submit(&self.pool, partition, endpoint.id, now).await?;
            submitted += 1;
        }

        Ok(PartitionOutcome::Scheduled(submitted))
    }
}
