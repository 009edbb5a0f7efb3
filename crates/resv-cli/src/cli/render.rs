//! Render a `RetryResult` for humans (console lines) or machines (JSON).
//!
//! The core performs no output of its own; this module is the only consumer
//! of `RetryResult` in the CLI.

use resv_core::retry::RetryResult;
use serde_json::{json, Value};

/// JSON shape matches the provider-tool convention: exactly one of
/// `capacityReservationId` or `error` is non-null.
pub fn to_json(result: &RetryResult) -> Value {
    json!({
        "success": result.success(),
        "capacityReservationId": result.reservation_id(),
        "attempts": result.attempts,
        "totalDurationSeconds": result.elapsed.as_secs(),
        "finalIntervalSeconds": result.final_interval.as_secs(),
        "error": result.error().map(|e| e.to_string()),
    })
}

pub fn print_console(result: &RetryResult) {
    if let Some(id) = result.reservation_id() {
        println!("Reservation acquired: {id}");
    } else if let Some(err) = result.error() {
        println!("Acquisition failed: {err}");
    }
    println!(
        "attempts: {}, elapsed: {}s, final interval: {}s",
        result.attempts,
        result.elapsed.as_secs(),
        result.final_interval.as_secs()
    );
}
