use upwatch_core::due::DEFAULT_GRACE_PERIOD_SECS;

/// Scheduler configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Seconds between scheduling cycles (default: `60`).
    pub scan_interval_secs: u64,
    /// Seconds a claim suppresses re-claiming the same endpoint
    /// (default: `90`).
    pub grace_period_secs: u64,
    /// Maximum endpoints claimed per partition per cycle (default: `100`).
    pub claim_batch_limit: i64,
}

impl SchedulerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `SCAN_INTERVAL_SECS`      | `60`    |
    /// | `CLAIM_GRACE_PERIOD_SECS` | `90`    |
    /// | `CLAIM_BATCH_LIMIT`       | `100`   |
    pub fn from_env() -> Self {
        let scan_interval_secs: u64 = std::env::var("SCAN_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("SCAN_INTERVAL_SECS must be a valid u64");

        let grace_period_secs: u64 = std::env::var("CLAIM_GRACE_PERIOD_SECS")
            .unwrap_or_else(|_| DEFAULT_GRACE_PERIOD_SECS.to_string())
            .parse()
            .expect("CLAIM_GRACE_PERIOD_SECS must be a valid u64");

        let claim_batch_limit: i64 = std::env::var("CLAIM_BATCH_LIMIT")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("CLAIM_BATCH_LIMIT must be a valid i64");

        Self {
            scan_interval_secs,
            grace_period_secs,
            claim_batch_limit,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 60,
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            claim_batch_limit: 100,
        }
    }
}
