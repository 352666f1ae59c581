// Prometheus metrics definitions for the relay.

use lazy_static::lazy_static;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    /// Upstream player lookups, by outcome (HTTP status or failure kind).
    pub static ref UPSTREAM_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("relay_upstream_requests_total", "Upstream player lookups"),
        &["outcome"],
    )
    .unwrap();

    /// Upstream round-trip time in seconds.
    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "relay_upstream_request_duration_seconds",
            "Upstream round-trip time in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
    )
    .unwrap();

    /// Handler panics converted into a 500 response.
    pub static ref HANDLER_PANICS_TOTAL: IntCounter = IntCounter::new(
        "relay_handler_panics_total",
        "Handler panics caught by the fallback layer",
    )
    .unwrap();
}

/// Register all metrics with the custom registry.
///
/// Calling this again is harmless: already-registered collectors are skipped.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(UPSTREAM_REQUESTS_TOTAL.clone()),
        Box::new(UPSTREAM_REQUEST_DURATION_SECONDS.clone()),
        Box::new(HANDLER_PANICS_TOTAL.clone()),
    ];

    for c in collectors {
        match REGISTRY.register(c) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => tracing::warn!("Failed to register metric: {e}"),
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {e}");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
