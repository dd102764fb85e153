//! Prometheus metrics collection for the phonebook service.
//!
//! Exposed on a separate HTTP port for scraping:
//!
//! - `phonebook_requests_total{entity, operation}` - Requests handled per resource operation
//! - `phonebook_request_duration_seconds{entity, operation}` - Handler latency histogram
//! - `phonebook_request_errors_total{entity, error}` - Failed requests by error key
//! - `phonebook_mutations_total{entity, action}` - Successful created/updated/deleted alerts

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Requests handled by entity and operation.
pub static REQUEST_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Handler latency by entity and operation.
pub static REQUEST_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Failed requests by entity and error key.
pub static REQUEST_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Successful mutations by entity and action.
pub static MUTATIONS: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup; recording before this is a no-op.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(
                            error = %e,
                            concat!("Failed to register metric ", stringify!($metric))
                        );
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        concat!("Failed to create metric ", stringify!($metric))
                    );
                }
            }
        };
    }

    register!(
        REQUEST_COUNTER,
        IntCounterVec::new(
            Opts::new(
                "phonebook_requests_total",
                "Requests handled by entity and operation"
            ),
            &["entity", "operation"]
        )
    );
    register!(
        REQUEST_LATENCY,
        HistogramVec::new(
            HistogramOpts::new(
                "phonebook_request_duration_seconds",
                "Handler latency by entity and operation"
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["entity", "operation"]
        )
    );
    register!(
        REQUEST_ERRORS,
        IntCounterVec::new(
            Opts::new(
                "phonebook_request_errors_total",
                "Failed requests by entity and error key"
            ),
            &["entity", "error"]
        )
    );
    register!(
        MUTATIONS,
        IntCounterVec::new(
            Opts::new(
                "phonebook_mutations_total",
                "Successful mutations by entity and action"
            ),
            &["entity", "action"]
        )
    );
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

/// Record a handled request with latency.
#[inline]
pub fn record_request(entity: &str, operation: &str, duration_secs: f64) {
    if let Some(c) = REQUEST_COUNTER.get() {
        c.with_label_values(&[entity, operation]).inc();
    }
    if let Some(h) = REQUEST_LATENCY.get() {
        h.with_label_values(&[entity, operation]).observe(duration_secs);
    }
}

/// Record a failed request.
#[inline]
pub fn record_request_error(entity: &str, error: &str) {
    if let Some(c) = REQUEST_ERRORS.get() {
        c.with_label_values(&[entity, error]).inc();
    }
}

/// Record a successful mutation.
#[inline]
pub fn record_mutation(entity: &str, action: &str) {
    if let Some(c) = MUTATIONS.get() {
        c.with_label_values(&[entity, action]).inc();
    }
}
