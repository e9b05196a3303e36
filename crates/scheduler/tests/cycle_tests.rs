//! Integration tests for the scheduling cycle: dispatch, readiness
//! skips, per-partition failure isolation, and idempotent re-runs.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use upwatch_core::tenant::TenantPartition;
use upwatch_core::types::{DbId, Timestamp};
use upwatch_db::models::endpoint::CreateEndpoint;
use upwatch_db::models::tenant::CreateTenant;
use upwatch_db::repositories::{EndpointRepo, TenantRepo};
use upwatch_scheduler::{SchedulerConfig, SchedulerCycle};

async fn register(pool: &PgPool, schema: &str) {
    TenantRepo::create(
        pool,
        &CreateTenant {
            schema_name: schema.to_string(),
            display_name: schema.to_uppercase(),
        },
    )
    .await
    .unwrap();
}

async fn register_and_provision(pool: &PgPool, schema: &str) -> TenantPartition {
    register(pool, schema).await;
    let partition = TenantPartition::new(schema).unwrap();
    upwatch_db::provisioning::create_partition(pool, &partition)
        .await
        .unwrap();
    partition
}

/// Insert an endpoint that became due well before `now`.
async fn insert_due_endpoint(
    pool: &PgPool,
    partition: &TenantPartition,
    url: &str,
    now: Timestamp,
) -> DbId {
    let endpoint = EndpointRepo::create(
        pool,
        partition,
        &CreateEndpoint {
            url: url.to_string(),
            interval_minutes: 5,
        },
    )
    .await
    .unwrap();

    let query = format!(
        "UPDATE \"{}\".endpoints SET created_at = $2 WHERE id = $1",
        partition.as_str()
    );
    sqlx::query(&query)
        .bind(endpoint.id)
        .bind(now - Duration::minutes(30))
        .execute(pool)
        .await
        .unwrap();

    endpoint.id
}

fn cycle(pool: &PgPool) -> SchedulerCycle {
    SchedulerCycle::new(pool.clone(), &SchedulerConfig::default())
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cycle_schedules_due_endpoints_across_partitions(pool: PgPool) {
    let now = Utc::now();
    let a = register_and_provision(&pool, "tenant_a").await;
    let b = register_and_provision(&pool, "tenant_b").await;
    let id_a = insert_due_endpoint(&pool, &a, "https://a.example", now).await;
    let id_b = insert_due_endpoint(&pool, &b, "https://b.example", now).await;

    let report = cycle(&pool).run_cycle(now).await.unwrap();

    assert_eq!(report.partitions_seen, 2);
    assert_eq!(report.scheduled, 2);
    assert!(report.skipped_partitions.is_empty());
    assert!(report.failed_partitions.is_empty());

    // One queued job per claimed endpoint, tagged with its partition.
    let jobs: Vec<(String, i64)> =
        sqlx::query_as("SELECT tenant_schema, endpoint_id FROM ping_jobs ORDER BY tenant_schema")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(jobs, vec![
        ("tenant_a".to_string(), id_a),
        ("tenant_b".to_string(), id_b),
    ]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unprovisioned_partition_is_skipped_not_failed(pool: PgPool) {
    let now = Utc::now();
    register(&pool, "tenant_pending").await;
    let b = register_and_provision(&pool, "tenant_b").await;
    insert_due_endpoint(&pool, &b, "https://b.example", now).await;

    let report = cycle(&pool).run_cycle(now).await.unwrap();

    assert_eq!(report.partitions_seen, 2);
    assert_eq!(report.scheduled, 1);
    assert_eq!(report.skipped_partitions, vec!["tenant_pending".to_string()]);
    assert!(report.failed_partitions.is_empty());
}

/// A corrupt partition (endpoints table exists but has the wrong shape)
/// fails alone; the remaining partitions are still scheduled.
#[sqlx::test(migrations = "../../db/migrations")]
async fn partition_failure_does_not_abort_cycle(pool: PgPool) {
    let now = Utc::now();

    register(&pool, "tenant_broken").await;
    sqlx::query("CREATE SCHEMA tenant_broken")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("CREATE TABLE tenant_broken.endpoints (id BIGSERIAL PRIMARY KEY)")
        .execute(&pool)
        .await
        .unwrap();

    let b = register_and_provision(&pool, "tenant_b").await;
    insert_due_endpoint(&pool, &b, "https://b.example", now).await;

    let report = cycle(&pool).run_cycle(now).await.unwrap();

    assert_eq!(report.partitions_seen, 2);
    assert_eq!(report.failed_partitions, vec!["tenant_broken".to_string()]);
    assert_eq!(report.scheduled, 1, "healthy partition must still schedule");
}

/// Re-running inside the grace period does not double-schedule the
/// same endpoint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn rapid_rerun_is_idempotent(pool: PgPool) {
    let now = Utc::now();
    let a = register_and_provision(&pool, "tenant_a").await;
    insert_due_endpoint(&pool, &a, "https://a.example", now).await;

    let c = cycle(&pool);
    let first = c.run_cycle(now).await.unwrap();
    assert_eq!(first.scheduled, 1);

    let second = c.run_cycle(now + Duration::seconds(30)).await.unwrap();
    assert_eq!(second.scheduled, 0, "claim within grace must suppress");

    let job_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ping_jobs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(job_count.0, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_tenants_are_not_scanned(pool: PgPool) {
    let now = Utc::now();
    let a = register_and_provision(&pool, "tenant_a").await;
    insert_due_endpoint(&pool, &a, "https://a.example", now).await;
    sqlx::query("UPDATE tenants SET is_active = FALSE WHERE schema_name = 'tenant_a'")
        .execute(&pool)
        .await
        .unwrap();

    let report = cycle(&pool).run_cycle(now).await.unwrap();
    assert_eq!(report.partitions_seen, 0);
    assert_eq!(report.scheduled, 0);
}
