//! HTTP probing.
//!
//! [`Prober`] is the seam between probe execution and the network; the
//! production implementation is a bounded-timeout reqwest GET, and the
//! executor tests substitute a stub.

use std::time::{Duration, Instant};

use upwatch_core::probe::ProbeOutcome;

/// Measured result of a single probe attempt.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub outcome: ProbeOutcome,
    pub latency_ms: i32,
}

/// Issues one probe against a monitored URL.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Perform one GET against `url`, measuring latency around the call.
    ///
    /// Never returns an error: every failure mode is folded into the
    /// [`ProbeOutcome`] classification.
    async fn probe(&self, url: &str) -> ProbeReport;
}

/// Production prober: a plain HTTP GET with a bounded timeout.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Build a prober whose requests time out after `timeout`.
    ///
    /// The timeout covers the whole request, so a hung connection is
    /// classified as a network error rather than suspending the worker.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeReport {
        let start = Instant::now();
        let outcome = match self.client.get(url).send().await {
            Ok(response) => ProbeOutcome::Response {
                code: response.status().as_u16(),
            },
            Err(e) => ProbeOutcome::NetworkError {
                detail: e.to_string(),
            },
        };
        let latency_ms = start.elapsed().as_millis().min(i32::MAX as u128) as i32;

        ProbeReport { outcome, latency_ms }
    }
}
