//! Attempt executor seam between the retry engine and a provisioning client.
//!
//! The retry loop never talks to a provider directly: it hands the request to
//! an `AttemptExecutor` and acts on the classified outcome. Classification
//! (retryable contention vs fatal provider error) is the executor's job; the
//! loop never inspects reason text.

use std::future::Future;

use crate::request::{Reservation, ReservationRequest};

/// Result of one acquisition attempt, already classified by the executor.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// The provider allocated the reservation.
    Success(Reservation),
    /// Transient contention (e.g. insufficient capacity); worth retrying.
    Retryable(String),
    /// Non-transient provider error (e.g. malformed request); never retried.
    Fatal(String),
}

/// One acquisition call against a provider. Real implementations talk to a
/// provisioning API; test implementations script a sequence of outcomes.
pub trait AttemptExecutor {
    /// Issue a single attempt for `request` and classify the result.
    fn attempt(
        &mut self,
        request: &ReservationRequest,
    ) -> impl Future<Output = AttemptOutcome> + Send;
}
