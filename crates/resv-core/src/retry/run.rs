//! Retry loop: drive acquisition attempts under a wall-clock budget.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::AcquireError;
use super::policy::{PolicyError, RetryPolicy};
use super::result::{Outcome, RetryResult};
use crate::executor::{AttemptExecutor, AttemptOutcome};
use crate::request::ReservationRequest;

/// Mutable state for one retry session, created per `acquire` call and
/// discarded when it returns.
struct Session {
    start: Instant,
    current_interval: std::time::Duration,
    /// 1-based count of attempts issued.
    attempts: u32,
}

impl Session {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            start: Instant::now(),
            current_interval: policy.initial_interval,
            attempts: 1,
        }
    }

    fn finish(self, outcome: Outcome) -> RetryResult {
        RetryResult {
            attempts: self.attempts,
            elapsed: self.start.elapsed(),
            final_interval: self.current_interval,
            outcome,
        }
    }
}

/// Acquire a reservation, retrying on transient contention with capped
/// exponential backoff until success, a fatal error, cancellation, or the
/// `max_duration` budget runs out.
///
/// The `Err` arm carries only policy validation failures; every runtime
/// terminal state (including deadline exhaustion) is encoded in the returned
/// `RetryResult`. The loop is sequential by design: a second attempt is never
/// issued while a backoff wait is in flight.
///
/// When `cancel` is supplied, it interrupts both an in-flight attempt and a
/// backoff sleep, yielding a `Cancelled` outcome with accurate counters.
pub async fn acquire<E>(
    request: &ReservationRequest,
    policy: &RetryPolicy,
    executor: &mut E,
    cancel: Option<&CancellationToken>,
) -> Result<RetryResult, PolicyError>
where
    E: AttemptExecutor,
{
    policy.validate()?;
    let mut session = Session::new(policy);

    while session.start.elapsed() < policy.max_duration {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Ok(cancelled(session));
            }
        }

        let outcome = match cancel {
            Some(token) => {
                tokio::select! {
                    outcome = executor.attempt(request) => outcome,
                    () = token.cancelled() => return Ok(cancelled(session)),
                }
            }
            None => executor.attempt(request).await,
        };

        match outcome {
            AttemptOutcome::Success(reservation) => {
                tracing::info!(
                    attempts = session.attempts,
                    elapsed_secs = session.start.elapsed().as_secs(),
                    id = %reservation.id,
                    "reservation acquired"
                );
                return Ok(session.finish(Outcome::Acquired(reservation)));
            }
            AttemptOutcome::Fatal(reason) => {
                tracing::warn!(
                    attempts = session.attempts,
                    %reason,
                    "non-retryable provider error"
                );
                return Ok(session.finish(Outcome::Failed(AcquireError::Fatal(reason))));
            }
            AttemptOutcome::Retryable(reason) => {
                let elapsed = session.start.elapsed();
                let remaining = policy.max_duration.saturating_sub(elapsed);
                // Strict comparison: a wait that exactly fills the remaining
                // budget still cannot be followed by an attempt, so stop now
                // with an accurate count instead of sleeping and failing.
                if remaining < session.current_interval {
                    let attempts = session.attempts;
                    return Ok(session.finish(Outcome::Failed(
                        AcquireError::InsufficientCapacity { attempts, elapsed },
                    )));
                }

                tracing::debug!(
                    attempt = session.attempts,
                    %reason,
                    wait_secs = session.current_interval.as_secs(),
                    "attempt failed, backing off"
                );

                match cancel {
                    Some(token) => {
                        tokio::select! {
                            () = tokio::time::sleep(session.current_interval) => {}
                            () = token.cancelled() => return Ok(cancelled(session)),
                        }
                    }
                    None => tokio::time::sleep(session.current_interval).await,
                }

                session.current_interval = policy.next_interval(session.current_interval);
                session.attempts += 1;
            }
        }
    }

    // Attempt latency consumed the rest of the budget before the next
    // attempt could start. Same cause as the in-loop short-circuit.
    let attempts = session.attempts;
    let elapsed = session.start.elapsed();
    Ok(session.finish(Outcome::Failed(AcquireError::InsufficientCapacity {
        attempts,
        elapsed,
    })))
}

fn cancelled(session: Session) -> RetryResult {
    tracing::debug!(attempts = session.attempts, "acquisition cancelled");
    let attempts = session.attempts;
    let elapsed = session.start.elapsed();
    session.finish(Outcome::Failed(AcquireError::Cancelled { attempts, elapsed }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::request::Reservation;

    /// Scripted executor: a fixed number of retryable failures, then success.
    struct FailThenSucceed {
        failures_left: u32,
        calls: u32,
    }

    impl FailThenSucceed {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: failures,
                calls: 0,
            }
        }
    }

    impl AttemptExecutor for FailThenSucceed {
        async fn attempt(&mut self, request: &ReservationRequest) -> AttemptOutcome {
            self.calls += 1;
            if self.failures_left > 0 {
                self.failures_left -= 1;
                AttemptOutcome::Retryable("InsufficientInstanceCapacity".to_string())
            } else {
                AttemptOutcome::Success(Reservation {
                    id: "cr-test-123456789".to_string(),
                    instance_type: request.instance_type.clone(),
                    availability_zone: request.availability_zone.clone(),
                    instance_count: request.instance_count,
                    state: "active".to_string(),
                })
            }
        }
    }

    /// Scripted executor that replays a fixed outcome sequence.
    struct Scripted {
        outcomes: std::vec::IntoIter<AttemptOutcome>,
        calls: u32,
    }

    impl Scripted {
        fn new(outcomes: Vec<AttemptOutcome>) -> Self {
            Self {
                outcomes: outcomes.into_iter(),
                calls: 0,
            }
        }
    }

    impl AttemptExecutor for Scripted {
        async fn attempt(&mut self, _request: &ReservationRequest) -> AttemptOutcome {
            self.calls += 1;
            self.outcomes.next().expect("script exhausted")
        }
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn policy(max_duration: u64, initial: u64, max: u64, multiplier: f64) -> RetryPolicy {
        RetryPolicy {
            max_duration: secs(max_duration),
            initial_interval: secs(initial),
            max_interval: secs(max),
            backoff_multiplier: multiplier,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_first_attempt() {
        let req = ReservationRequest::default();
        let mut exec = FailThenSucceed::new(0);
        let result = acquire(&req, &RetryPolicy::default(), &mut exec, None)
            .await
            .unwrap();
        assert!(result.success());
        assert_eq!(result.attempts, 1);
        assert_eq!(result.elapsed, Duration::ZERO);
        assert_eq!(result.reservation_id(), Some("cr-test-123456789"));
        assert_eq!(exec.calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn three_failures_then_success_on_fourth() {
        // The simulator's reference scenario: 60 minute budget, 30s initial,
        // 300s cap, doubling. Sleeps are 30 + 60 + 120 = 210s of virtual time.
        let req = ReservationRequest::default();
        let mut exec = FailThenSucceed::new(3);
        let result = acquire(&req, &policy(3600, 30, 300, 2.0), &mut exec, None)
            .await
            .unwrap();
        assert!(result.success());
        assert_eq!(result.attempts, 4);
        assert_eq!(result.elapsed, secs(210));
        assert_eq!(result.final_interval, secs(240));
        assert_eq!(exec.calls, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_failure_returns_immediately_without_sleep() {
        let req = ReservationRequest::default();
        let mut exec = Scripted::new(vec![AttemptOutcome::Fatal(
            "MalformedParameter".to_string(),
        )]);
        let result = acquire(&req, &RetryPolicy::default(), &mut exec, None)
            .await
            .unwrap();
        assert!(!result.success());
        assert_eq!(result.attempts, 1);
        assert_eq!(result.elapsed, Duration::ZERO);
        assert_eq!(
            result.error(),
            Some(&AcquireError::Fatal("MalformedParameter".to_string()))
        );
        assert_eq!(exec.calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_after_retryable_is_not_retried() {
        let req = ReservationRequest::default();
        let mut exec = Scripted::new(vec![
            AttemptOutcome::Retryable("InsufficientInstanceCapacity".to_string()),
            AttemptOutcome::Fatal("Unauthorized".to_string()),
        ]);
        let result = acquire(&req, &policy(3600, 30, 300, 2.0), &mut exec, None)
            .await
            .unwrap();
        assert_eq!(result.attempts, 2);
        assert_eq!(result.elapsed, secs(30));
        assert!(matches!(result.error(), Some(AcquireError::Fatal(_))));
        assert_eq!(exec.calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_contention_exhausts_budget_within_deadline() {
        let req = ReservationRequest::default();
        let mut exec = FailThenSucceed::new(u32::MAX);
        let result = acquire(&req, &policy(3600, 30, 300, 2.0), &mut exec, None)
            .await
            .unwrap();
        assert!(!result.success());
        // Sleeps: 30, 60, 120, 240, then 300 each; the 15th attempt sees
        // 150s remaining, less than the 300s interval, and stops.
        assert_eq!(result.attempts, 15);
        assert_eq!(result.elapsed, secs(3450));
        assert!(result.elapsed <= secs(3600));
        assert!(matches!(
            result.error(),
            Some(AcquireError::InsufficientCapacity { attempts: 15, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn budget_smaller_than_initial_interval_fails_fast() {
        let req = ReservationRequest::default();
        let mut exec = FailThenSucceed::new(u32::MAX);
        let result = acquire(&req, &policy(10, 30, 300, 2.0), &mut exec, None)
            .await
            .unwrap();
        assert!(!result.success());
        assert_eq!(result.attempts, 1);
        assert_eq!(result.elapsed, Duration::ZERO);
        assert_eq!(exec.calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_exactly_equal_to_interval_fails() {
        // remaining == current_interval must not sleep: the comparison is
        // strict, so a wait that fills the whole budget is rejected.
        let req = ReservationRequest::default();
        let mut exec = FailThenSucceed::new(u32::MAX);
        let result = acquire(&req, &policy(30, 30, 300, 2.0), &mut exec, None)
            .await
            .unwrap();
        assert!(!result.success());
        assert_eq!(result.attempts, 1);
        assert_eq!(result.elapsed, Duration::ZERO);
        assert_eq!(result.final_interval, secs(30));
        assert_eq!(exec.calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn constant_multiplier_still_bounded_by_deadline() {
        let req = ReservationRequest::default();
        let mut exec = FailThenSucceed::new(u32::MAX);
        let result = acquire(&req, &policy(100, 30, 300, 1.0), &mut exec, None)
            .await
            .unwrap();
        assert!(!result.success());
        // Sleeps at 30s each: attempts at 0, 30, 60, 90; then 10s remain.
        assert_eq!(result.attempts, 4);
        assert_eq!(result.elapsed, secs(90));
        assert_eq!(result.final_interval, secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_policy_is_rejected_before_any_attempt() {
        let req = ReservationRequest::default();
        let mut exec = FailThenSucceed::new(0);
        let bad = policy(3600, 60, 30, 2.0);
        let err = acquire(&req, &bad, &mut exec, None).await.unwrap_err();
        assert!(matches!(err, PolicyError::IntervalBoundsInverted { .. }));
        assert_eq!(exec.calls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_backoff_sleep() {
        let req = ReservationRequest::default();
        let mut exec = FailThenSucceed::new(u32::MAX);
        let token = CancellationToken::new();
        let canceller = token.clone();

        let pol = policy(3600, 30, 300, 2.0);
        let (result, ()) = tokio::join!(
            acquire(&req, &pol, &mut exec, Some(&token)),
            async {
                // Fires during the second backoff sleep (30s..90s).
                tokio::time::sleep(secs(45)).await;
                canceller.cancel();
            }
        );
        let result = result.unwrap();
        assert!(!result.success());
        assert_eq!(result.elapsed, secs(45));
        assert!(matches!(
            result.error(),
            Some(AcquireError::Cancelled { attempts: 2, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn pre_cancelled_token_short_circuits() {
        let req = ReservationRequest::default();
        let mut exec = FailThenSucceed::new(0);
        let token = CancellationToken::new();
        token.cancel();
        let result = acquire(&req, &RetryPolicy::default(), &mut exec, Some(&token))
            .await
            .unwrap();
        assert!(matches!(
            result.error(),
            Some(AcquireError::Cancelled { attempts: 1, .. })
        ));
        assert_eq!(exec.calls, 0);
    }
}
