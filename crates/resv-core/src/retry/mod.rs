//! Retry and backoff engine.
//!
//! This module owns the timing/attempt state machine for acquiring a capacity
//! reservation under contention: whether to issue another attempt, how long to
//! wait, and when to give up. Outcome classification (retryable vs fatal)
//! lives behind the `AttemptExecutor` seam, not here.

mod error;
mod policy;
mod result;
mod run;

pub use error::AcquireError;
pub use policy::{PolicyError, RetryPolicy};
pub use result::{Outcome, RetryResult};
pub use run::acquire;
