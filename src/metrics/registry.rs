// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // RELAY METRICS
    // ============================================================================

    /// Answers given by `POST /generate-image`
    pub static ref RELAY_REQUESTS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("relay_requests_total", "Total generate-image requests answered"),
        &["status_code", "code"], // code: OK or the error code
        REGISTRY
    ).unwrap();

    /// Relay request duration
    pub static ref RELAY_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("relay_duration_seconds", "Generate-image request duration")
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 90.0]),
        &["status_code"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // UPSTREAM API METRICS
    // ============================================================================

    /// Upstream Responses API calls
    pub static ref UPSTREAM_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("upstream_calls_total", "Total upstream image-generation calls"),
        &["outcome"], // outcome: success, error, timeout
        REGISTRY
    ).unwrap();

    /// Upstream call duration
    pub static ref UPSTREAM_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("upstream_duration_seconds", "Upstream call duration")
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 45.0, 60.0]),
        &["outcome"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // CLIENT METRICS
    // ============================================================================

    /// Generation attempts finished by the client orchestrator
    pub static ref GENERATIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("generations_total", "Total generations finished by the client"),
        &["outcome"], // outcome: succeeded, failed, superseded
        REGISTRY
    ).unwrap();

    /// Failed generations by error kind
    pub static ref GENERATION_ERRORS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("generation_errors_total", "Failed generations by error kind"),
        &["kind"], // kind: validation, network, api, file, generation, unknown
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
