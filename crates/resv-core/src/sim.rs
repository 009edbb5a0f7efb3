//! Simulated provisioning provider for demos and tests.
//!
//! Stands in for a real provisioning client behind the `AttemptExecutor`
//! seam: reports `InsufficientInstanceCapacity` for a configured number of
//! attempts, then allocates. The retry engine cannot tell it apart from a
//! networked implementation.

use crate::executor::{AttemptExecutor, AttemptOutcome};
use crate::request::{Reservation, ReservationRequest};

/// Reservation id issued by the simulator.
pub const SIMULATED_RESERVATION_ID: &str = "cr-test-123456789";

/// Provider double that fails with capacity contention a fixed number of
/// times before allocating.
#[derive(Debug)]
pub struct SimulatedProvider {
    failures_before_success: u32,
    attempts_seen: u32,
}

impl SimulatedProvider {
    /// A provider that rejects the first `failures_before_success` attempts
    /// as retryable contention and allocates on the next one.
    pub fn contended(failures_before_success: u32) -> Self {
        Self {
            failures_before_success,
            attempts_seen: 0,
        }
    }

    /// A provider that never has capacity.
    pub fn exhausted() -> Self {
        Self::contended(u32::MAX)
    }

    /// How many attempts this provider has served.
    pub fn attempts_seen(&self) -> u32 {
        self.attempts_seen
    }
}

impl AttemptExecutor for SimulatedProvider {
    async fn attempt(&mut self, request: &ReservationRequest) -> AttemptOutcome {
        self.attempts_seen += 1;
        if self.attempts_seen <= self.failures_before_success {
            AttemptOutcome::Retryable(
                "InsufficientInstanceCapacity: we currently do not have sufficient capacity \
                 in the availability zone you requested"
                    .to_string(),
            )
        } else {
            AttemptOutcome::Success(Reservation {
                id: SIMULATED_RESERVATION_ID.to_string(),
                instance_type: request.instance_type.clone(),
                availability_zone: request.availability_zone.clone(),
                instance_count: request.instance_count,
                state: "active".to_string(),
            })
        }
    }
}
