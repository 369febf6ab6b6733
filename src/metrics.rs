//! Metrics for observability.
//!
//! Exports Prometheus-compatible metrics through the `metrics` facade for:
//! - Remote history fetches
//! - Replication dispatches
//! - Timeouts (per-call vs overall deadline)
//! - Repair gate decisions
//! - Whole resend calls
//!
//! # Metric Naming Convention
//!
//! All metrics are prefixed with `resend_` and follow Prometheus conventions:
//! - Counters end in `_total`
//! - Histograms track distributions (duration, size)
//!
//! No recorder is installed here; the embedding service owns the exporter.

use metrics::{counter, histogram};
use std::time::Duration;

fn status(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Record one raw-history fetch round trip.
pub fn record_history_fetch(domain_id: &str, success: bool, duration: Duration) {
    counter!("resend_history_fetches_total", "domain_id" => domain_id.to_string(), "status" => status(success)).increment(1);
    histogram!("resend_history_fetch_duration_seconds", "domain_id" => domain_id.to_string())
        .record(duration.as_secs_f64());
}

/// Record raw event batches returned by one page.
pub fn record_batches_fetched(domain_id: &str, count: usize) {
    counter!("resend_batches_fetched_total", "domain_id" => domain_id.to_string()).increment(count as u64);
}

/// Record one replication dispatch to the local applier.
pub fn record_dispatch(domain_id: &str, success: bool, duration: Duration) {
    counter!("resend_dispatches_total", "domain_id" => domain_id.to_string(), "status" => status(success)).increment(1);
    histogram!("resend_dispatch_duration_seconds", "domain_id" => domain_id.to_string())
        .record(duration.as_secs_f64());
}

/// Record a timeout, labelled by which bound governed.
pub fn record_timeout(operation: &str, bound: &str) {
    counter!("resend_timeouts_total", "operation" => operation.to_string(), "bound" => bound.to_string()).increment(1);
}

/// Record a current-execution invariant check.
pub fn record_repair_check(outcome: &str) {
    counter!("resend_repair_checks_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a current-execution repair attempt.
pub fn record_repair_fix(outcome: &str) {
    counter!("resend_repair_fixes_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a finished resend call.
pub fn record_resend(domain_id: &str, outcome: &str, batches: usize, duration: Duration) {
    counter!("resend_calls_total", "domain_id" => domain_id.to_string(), "outcome" => outcome.to_string()).increment(1);
    histogram!("resend_batches_per_call", "domain_id" => domain_id.to_string()).record(batches as f64);
    histogram!("resend_call_duration_seconds", "domain_id" => domain_id.to_string())
        .record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    // Without an installed recorder these are no-ops; they must not panic.
    #[test]
    fn test_recording_without_recorder() {
        record_history_fetch("d1", true, Duration::from_millis(5));
        record_history_fetch("d1", false, Duration::from_millis(5));
        record_batches_fetched("d1", 3);
        record_dispatch("d1", true, Duration::from_millis(1));
        record_timeout("fetch_history", "call");
        record_repair_check("healthy");
        record_repair_fix("fixed");
        record_resend("d1", "success", 4, Duration::from_millis(20));
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status(true), "success");
        assert_eq!(status(false), "failure");
    }
}
