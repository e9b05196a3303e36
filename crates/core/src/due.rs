//! Due-endpoint calculation and claim suppression.
//!
//! The canonical due/grace algorithm for the whole pipeline. The scanner's
//! claim query in `upwatch-db` implements the same predicate in SQL; the
//! data-layer tests assert the two agree.

use chrono::Duration;

use crate::types::Timestamp;

/// How long a claim suppresses re-claiming the same endpoint while its
/// probe is still outstanding. After this window a crashed worker's claim
/// is ignored and the endpoint becomes schedulable again.
pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 90;

/// The instant an endpoint next becomes due.
///
/// The baseline is the later of the last recorded check and the creation
/// time; an endpoint that has never been checked uses `created_at` alone.
pub fn due_at(
    created_at: Timestamp,
    last_checked_at: Option<Timestamp>,
    interval_minutes: i32,
) -> Timestamp {
    let baseline = last_checked_at.map_or(created_at, |checked| checked.max(created_at));
    baseline + Duration::minutes(i64::from(interval_minutes))
}

/// Whether an endpoint's check interval has elapsed at `now`.
pub fn is_due(
    now: Timestamp,
    created_at: Timestamp,
    last_checked_at: Option<Timestamp>,
    interval_minutes: i32,
) -> bool {
    now >= due_at(created_at, last_checked_at, interval_minutes)
}

/// Whether a previous claim still suppresses this endpoint.
///
/// A claim is outstanding when it is newer than the last recorded check
/// (the probe it dispatched has not landed yet) and younger than the
/// grace period. A claim older than the last check is stale — its probe
/// already completed — and never suppresses.
pub fn is_claim_outstanding(
    now: Timestamp,
    last_checked_at: Option<Timestamp>,
    last_enqueued_at: Option<Timestamp>,
    grace_period: Duration,
) -> bool {
    let Some(enqueued) = last_enqueued_at else {
        return false;
    };
    let newer_than_check = last_checked_at.map_or(true, |checked| enqueued > checked);
    newer_than_check && now - enqueued < grace_period
}

/// Whether the scanner should claim this endpoint at `now`.
pub fn is_claimable(
    now: Timestamp,
    created_at: Timestamp,
    last_checked_at: Option<Timestamp>,
    last_enqueued_at: Option<Timestamp>,
    interval_minutes: i32,
    grace_period: Duration,
) -> bool {
    is_due(now, created_at, last_checked_at, interval_minutes)
        && !is_claim_outstanding(now, last_checked_at, last_enqueued_at, grace_period)
}

/// Milliseconds between an endpoint becoming due and being claimed.
/// Negative lags (claimed exactly on time) clamp to zero.
pub fn schedule_lag_ms(now: Timestamp, due: Timestamp) -> i64 {
    (now - due).num_milliseconds().max(0)
}
