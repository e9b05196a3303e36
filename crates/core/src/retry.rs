//! Retry policy for transient probe failures.
//!
//! The queue enforces this schedule; the worker only reports whether an
//! attempt failed transiently. Delays grow exponentially from the base
//! (60 s, 120 s, 240 s, ...) up to the attempt ceiling.

use std::time::Duration;

/// Maximum number of delivery attempts before a job is dead-lettered.
pub const DEFAULT_MAX_ATTEMPTS: i32 = 3;

/// Base delay before the first redelivery.
pub const DEFAULT_RETRY_BASE_DELAY_SECS: u64 = 60;

/// Exponent cap so the doubling can never overflow.
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Delay before redelivering a job whose `attempt`-th delivery failed
/// (`attempt` is 1-based): `base * 2^(attempt - 1)`.
pub fn backoff_delay(base: Duration, attempt: i32) -> Duration {
    let exponent = attempt.saturating_sub(1).clamp(0, MAX_BACKOFF_EXPONENT as i32) as u32;
    base * 2u32.pow(exponent)
}

/// Whether `attempt` deliveries have reached the ceiling.
pub fn attempts_exhausted(attempt: i32, max_attempts: i32) -> bool {
    attempt >= max_attempts
}
