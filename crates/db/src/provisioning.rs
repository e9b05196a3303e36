//! Per-tenant schema provisioning.
//!
//! Tenant onboarding is owned by an external service; this module holds
//! the canonical DDL for a tenant partition so that service and the test
//! suites create schemas the scanner can consume. The scheduling cycle
//! treats a registered tenant without this schema as skipped, so
//! registration and provisioning do not have to be atomic.

use sqlx::PgPool;
use upwatch_core::tenant::TenantPartition;

/// Create the partition's schema and `endpoints` table if absent.
pub async fn create_partition(
    pool: &PgPool,
    partition: &TenantPartition,
) -> Result<(), sqlx::Error> {
    let schema = partition.as_str();

    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\""))
        .execute(pool)
        .await?;

    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS \"{schema}\".endpoints ( \
             id BIGSERIAL PRIMARY KEY, \
             url TEXT NOT NULL, \
             interval_minutes INTEGER NOT NULL, \
             last_status TEXT NOT NULL DEFAULT 'pending', \
             last_checked_at TIMESTAMPTZ, \
             last_latency_ms INTEGER, \
             last_enqueued_at TIMESTAMPTZ, \
             created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
             updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
             CONSTRAINT uq_endpoints_url UNIQUE (url) \
         )"
    ))
    .execute(pool)
    .await?;

    Ok(())
}
