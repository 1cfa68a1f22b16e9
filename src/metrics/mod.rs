// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    GENERATIONS,
    GENERATION_ERRORS,
    RELAY_DURATION,
    RELAY_REQUESTS,
    UPSTREAM_CALLS,
    UPSTREAM_DURATION,
};

use crate::error::ErrorKind;

/// Helper to record one relay answer
pub fn record_relay_request(status_code: u16, code: &str, duration_secs: f64) {
    let status = status_code.to_string();
    RELAY_REQUESTS.with_label_values(&[&status, code]).inc();
    RELAY_DURATION
        .with_label_values(&[&status])
        .observe(duration_secs);
}

/// Helper to record an upstream call (`success`, `error` or `timeout`)
pub fn record_upstream_call(outcome: &str, duration_secs: f64) {
    UPSTREAM_CALLS.with_label_values(&[outcome]).inc();
    UPSTREAM_DURATION
        .with_label_values(&[outcome])
        .observe(duration_secs);
}

pub fn record_generation_success() {
    GENERATIONS.with_label_values(&["succeeded"]).inc();
}

pub fn record_generation_failure(kind: ErrorKind) {
    GENERATIONS.with_label_values(&["failed"]).inc();
    GENERATION_ERRORS.with_label_values(&[kind.as_str()]).inc();
}

/// A result arrived after a newer generation had started
pub fn record_generation_superseded() {
    GENERATIONS.with_label_values(&["superseded"]).inc();
}
