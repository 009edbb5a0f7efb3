//! Terminal failure kinds for one acquisition call.

use std::time::Duration;

use thiserror::Error;

/// Why an acquisition call ended without a reservation.
///
/// Deadline exhaustion is a single kind whether the loop short-circuited
/// ("the next wait cannot fit before the deadline") or failed the loop entry
/// check: both mean the retry budget was consumed by contention.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AcquireError {
    /// The whole `max_duration` budget was spent on retryable failures.
    #[error("insufficient capacity after {attempts} attempts over {} seconds", elapsed.as_secs())]
    InsufficientCapacity { attempts: u32, elapsed: Duration },
    /// The executor reported a non-retryable provider error.
    #[error("fatal provider error: {0}")]
    Fatal(String),
    /// The caller's cancellation token fired before the call resolved.
    #[error("cancelled after {attempts} attempts over {} seconds", elapsed.as_secs())]
    Cancelled { attempts: u32, elapsed: Duration },
}

impl AcquireError {
    /// True when re-running with a larger `max_duration` could plausibly
    /// succeed (deadline exhaustion, as opposed to a fatal provider error).
    pub fn is_capacity_exhaustion(&self) -> bool {
        matches!(self, AcquireError::InsufficientCapacity { .. })
    }
}
