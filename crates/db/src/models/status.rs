//! Status helper enum mapping to the `ping_job_statuses` lookup table.
//!
//! Variant discriminants match the seed data order (1-based SMALLSERIAL).

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// Lifecycle status of a ping job in the queue.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingJobStatus {
    /// Enqueued and (once `available_at` passes) claimable by a worker.
    Pending = 1,
    /// Claimed by a worker; the probe is executing.
    Running = 2,
    /// Terminal: the probe produced a result that needs no redelivery.
    Completed = 3,
    /// Terminal: retries exhausted, dead-letter alert emitted.
    DeadLettered = 4,
}

impl PingJobStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }
}

impl From<PingJobStatus> for StatusId {
    fn from(value: PingJobStatus) -> Self {
        value as StatusId
    }
}
