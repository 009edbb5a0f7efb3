//! Terminal outcome of one acquisition call.

use std::time::Duration;

use super::error::AcquireError;
use crate::request::Reservation;

/// How the call ended: exactly one of reservation or error is present.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Acquired(Reservation),
    Failed(AcquireError),
}

/// Result of one full retry session. Every exit path (success, fatal,
/// deadline exhaustion, cancellation) reports attempt count, elapsed time
/// and the final backoff interval so callers can tell why acquisition ended
/// and how much budget it consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryResult {
    pub outcome: Outcome,
    /// 1-based count of attempts issued.
    pub attempts: u32,
    /// Wall-clock time from session start to return.
    pub elapsed: Duration,
    /// The backoff interval in effect when the call returned.
    pub final_interval: Duration,
}

impl RetryResult {
    pub fn success(&self) -> bool {
        matches!(self.outcome, Outcome::Acquired(_))
    }

    /// Provider-assigned reservation id, present only on success.
    pub fn reservation_id(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Acquired(r) => Some(&r.id),
            Outcome::Failed(_) => None,
        }
    }

    /// Terminal error, present only on failure.
    pub fn error(&self) -> Option<&AcquireError> {
        match &self.outcome {
            Outcome::Acquired(_) => None,
            Outcome::Failed(e) => Some(e),
        }
    }
}
