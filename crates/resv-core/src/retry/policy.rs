//! Backoff policy: timing parameters and interval growth.

use std::time::Duration;

use thiserror::Error;

/// Invalid policy parameters, rejected before the retry loop starts.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("max_duration must be greater than zero")]
    ZeroMaxDuration,
    #[error("initial_interval must be greater than zero")]
    ZeroInitialInterval,
    #[error("max_interval ({max:?}) must be >= initial_interval ({initial:?})")]
    IntervalBoundsInverted { initial: Duration, max: Duration },
    #[error("backoff_multiplier must be >= 1.0, got {0}")]
    ShrinkingMultiplier(f64),
}

/// Time-bounded exponential backoff parameters. Immutable, caller-supplied.
///
/// There is no attempt cap: the loop is bounded purely by `max_duration`,
/// so a multiplier of exactly 1.0 (constant interval) still terminates.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total wall-clock budget for all attempts.
    pub max_duration: Duration,
    /// Delay before the second attempt.
    pub initial_interval: Duration,
    /// Upper bound any computed delay may reach.
    pub max_interval: Duration,
    /// Growth factor applied to the interval after each failed attempt.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(60 * 60),
            initial_interval: Duration::from_secs(30),
            max_interval: Duration::from_secs(300),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Check the policy invariants. Called by `acquire` before the first
    /// attempt; invalid values never enter the loop.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.max_duration.is_zero() {
            return Err(PolicyError::ZeroMaxDuration);
        }
        if self.initial_interval.is_zero() {
            return Err(PolicyError::ZeroInitialInterval);
        }
        if self.max_interval < self.initial_interval {
            return Err(PolicyError::IntervalBoundsInverted {
                initial: self.initial_interval,
                max: self.max_interval,
            });
        }
        // NaN also fails this comparison and is rejected.
        if !(self.backoff_multiplier >= 1.0) {
            return Err(PolicyError::ShrinkingMultiplier(self.backoff_multiplier));
        }
        Ok(())
    }

    /// Next backoff delay after a failed attempt: multiplicative growth
    /// clamped to `max_interval`. Clamped in f64 space so an extreme
    /// multiplier cannot overflow `Duration`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let grown = current.as_secs_f64() * self.backoff_multiplier;
        Duration::from_secs_f64(grown.min(self.max_interval.as_secs_f64()))
    }
}
