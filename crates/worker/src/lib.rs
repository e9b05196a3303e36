//! upwatch probe execution: claims ping jobs from the queue, runs one
//! bounded-timeout HTTP GET per job, persists the outcome, and drives
//! retry/dead-letter handling for transient failures.

pub mod config;
pub mod executor;
pub mod prober;
pub mod runner;

pub use config::WorkerConfig;
pub use executor::{ExecutionOutcome, PingWorker, WorkerError};
pub use prober::{HttpProber, ProbeReport, Prober};
pub use runner::WorkerRunner;
