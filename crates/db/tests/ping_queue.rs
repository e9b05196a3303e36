//! Integration tests for the ping-job queue: claim semantics, attempt
//! counting, backoff-driven redelivery, and the dead-letter ceiling.

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use upwatch_core::tenant::TenantPartition;
use upwatch_db::models::status::PingJobStatus;
use upwatch_db::repositories::{PingJobRepo, RetryDecision};

const MAX_ATTEMPTS: i32 = 3;

fn base_delay() -> StdDuration {
    StdDuration::from_secs(60)
}

fn partition() -> TenantPartition {
    TenantPartition::new("tenant_q").unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_enqueues_immediately_available_job(pool: PgPool) {
    let now = Utc::now();
    let job = PingJobRepo::submit(&pool, &partition(), 42, now).await.unwrap();

    assert_eq!(job.tenant_schema, "tenant_q");
    assert_eq!(job.endpoint_id, 42);
    assert_eq!(job.status_id, PingJobStatus::Pending.id());
    assert_eq!(job.attempt_count, 0);
    assert!(job.claimed_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_increments_attempt_and_marks_running(pool: PgPool) {
    let now = Utc::now();
    let submitted = PingJobRepo::submit(&pool, &partition(), 42, now).await.unwrap();

    let claimed = PingJobRepo::claim_next(&pool, now).await.unwrap().unwrap();
    assert_eq!(claimed.id, submitted.id);
    assert_eq!(claimed.status_id, PingJobStatus::Running.id());
    assert_eq!(claimed.attempt_count, 1);
    assert!(claimed.claimed_at.is_some());

    // The queue is drained; nothing further to claim.
    assert!(PingJobRepo::claim_next(&pool, now).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn retry_hides_job_until_backoff_elapses(pool: PgPool) {
    let now = Utc::now();
    PingJobRepo::submit(&pool, &partition(), 42, now).await.unwrap();
    let job = PingJobRepo::claim_next(&pool, now).await.unwrap().unwrap();

    let decision =
        PingJobRepo::request_retry(&pool, &job, MAX_ATTEMPTS, base_delay(), now, "timed out")
            .await
            .unwrap();
    assert_eq!(
        decision,
        RetryDecision::Scheduled {
            delay: StdDuration::from_secs(60)
        }
    );

    // Invisible while the backoff runs.
    assert!(PingJobRepo::claim_next(&pool, now).await.unwrap().is_none());
    assert!(PingJobRepo::claim_next(&pool, now + Duration::seconds(59))
        .await
        .unwrap()
        .is_none());

    // Visible again afterwards, with the attempt count advanced.
    let redelivered = PingJobRepo::claim_next(&pool, now + Duration::seconds(61))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(redelivered.id, job.id);
    assert_eq!(redelivered.attempt_count, 2);
    assert_eq!(redelivered.last_error.as_deref(), Some("timed out"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn backoff_doubles_per_attempt(pool: PgPool) {
    let mut now = Utc::now();
    PingJobRepo::submit(&pool, &partition(), 42, now).await.unwrap();

    let first = PingJobRepo::claim_next(&pool, now).await.unwrap().unwrap();
    let d1 = PingJobRepo::request_retry(&pool, &first, 10, base_delay(), now, "x")
        .await
        .unwrap();
    assert_eq!(
        d1,
        RetryDecision::Scheduled {
            delay: StdDuration::from_secs(60)
        }
    );

    now += Duration::seconds(61);
    let second = PingJobRepo::claim_next(&pool, now).await.unwrap().unwrap();
    let d2 = PingJobRepo::request_retry(&pool, &second, 10, base_delay(), now, "x")
        .await
        .unwrap();
    assert_eq!(
        d2,
        RetryDecision::Scheduled {
            delay: StdDuration::from_secs(120)
        }
    );
}

/// With a ceiling of 3, the third failed delivery exhausts the job and
/// dead-letters it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn third_failure_exhausts_and_dead_letters(pool: PgPool) {
    // Zero base delay so every redelivery is immediately claimable.
    let zero = StdDuration::ZERO;
    let mut now = Utc::now();
    PingJobRepo::submit(&pool, &partition(), 42, now).await.unwrap();

    for expected_attempt in 1..MAX_ATTEMPTS {
        let job = PingJobRepo::claim_next(&pool, now).await.unwrap().unwrap();
        assert_eq!(job.attempt_count, expected_attempt);
        let decision = PingJobRepo::request_retry(&pool, &job, MAX_ATTEMPTS, zero, now, "down")
            .await
            .unwrap();
        assert!(matches!(decision, RetryDecision::Scheduled { .. }));
        now += Duration::seconds(1);
    }

    let last = PingJobRepo::claim_next(&pool, now).await.unwrap().unwrap();
    assert_eq!(last.attempt_count, MAX_ATTEMPTS);
    let decision = PingJobRepo::request_retry(&pool, &last, MAX_ATTEMPTS, zero, now, "down")
        .await
        .unwrap();
    assert_eq!(decision, RetryDecision::Exhausted);

    let row = PingJobRepo::find_by_id(&pool, last.id).await.unwrap().unwrap();
    assert_eq!(row.status_id, PingJobStatus::DeadLettered.id());
    assert_eq!(row.last_error.as_deref(), Some("down"));

    // Terminal: nothing left to claim.
    assert!(PingJobRepo::claim_next(&pool, now).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn complete_acks_job(pool: PgPool) {
    let now = Utc::now();
    PingJobRepo::submit(&pool, &partition(), 42, now).await.unwrap();
    let job = PingJobRepo::claim_next(&pool, now).await.unwrap().unwrap();

    PingJobRepo::complete(&pool, job.id, now).await.unwrap();

    let row = PingJobRepo::find_by_id(&pool, job.id).await.unwrap().unwrap();
    assert_eq!(row.status_id, PingJobStatus::Completed.id());
    assert!(row.completed_at.is_some());
    assert!(PingJobRepo::claim_next(&pool, now).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oldest_available_job_claimed_first(pool: PgPool) {
    let now = Utc::now();
    let older = PingJobRepo::submit(&pool, &partition(), 1, now - Duration::seconds(30))
        .await
        .unwrap();
    let newer = PingJobRepo::submit(&pool, &partition(), 2, now).await.unwrap();

    let first = PingJobRepo::claim_next(&pool, now).await.unwrap().unwrap();
    let second = PingJobRepo::claim_next(&pool, now).await.unwrap().unwrap();
    assert_eq!(first.id, older.id);
    assert_eq!(second.id, newer.id);
}
