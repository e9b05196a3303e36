use upwatch_core::retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY_SECS};

/// Worker configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Seconds between queue polls (default: `1`).
    pub poll_interval_secs: u64,
    /// HTTP probe timeout in seconds (default: `10`).
    pub probe_timeout_secs: u64,
    /// Delivery attempts before a job is dead-lettered (default: `3`).
    pub max_attempts: i32,
    /// Base delay in seconds for exponential retry backoff (default: `60`).
    pub retry_base_delay_secs: u64,
    /// Webhook URL for dead-letter alerts; alert forwarding is disabled
    /// when unset.
    pub alert_webhook_url: Option<String>,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default  |
    /// |-------------------------|----------|
    /// | `POLL_INTERVAL_SECS`    | `1`      |
    /// | `PROBE_TIMEOUT_SECS`    | `10`     |
    /// | `MAX_PROBE_ATTEMPTS`    | `3`      |
    /// | `RETRY_BASE_DELAY_SECS` | `60`     |
    /// | `ALERT_WEBHOOK_URL`     | disabled |
    pub fn from_env() -> Self {
        let poll_interval_secs: u64 = std::env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("POLL_INTERVAL_SECS must be a valid u64");

        let probe_timeout_secs: u64 = std::env::var("PROBE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("PROBE_TIMEOUT_SECS must be a valid u64");

        let max_attempts: i32 = std::env::var("MAX_PROBE_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
            .parse()
            .expect("MAX_PROBE_ATTEMPTS must be a valid i32");

        let retry_base_delay_secs: u64 = std::env::var("RETRY_BASE_DELAY_SECS")
            .unwrap_or_else(|_| DEFAULT_RETRY_BASE_DELAY_SECS.to_string())
            .parse()
            .expect("RETRY_BASE_DELAY_SECS must be a valid u64");

        let alert_webhook_url = std::env::var("ALERT_WEBHOOK_URL").ok();

        Self {
            poll_interval_secs,
            probe_timeout_secs,
            max_attempts,
            retry_base_delay_secs,
            alert_webhook_url,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 1,
            probe_timeout_secs: 10,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay_secs: DEFAULT_RETRY_BASE_DELAY_SECS,
            alert_webhook_url: None,
        }
    }
}
