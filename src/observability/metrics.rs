//! Metrics collection and exposition.
//!
//! # Metrics
//! - `urlshort_requests_total` (counter): requests by outcome and layer
//! - `urlshort_request_duration_seconds` (histogram): dispatch latency by outcome
//! - `urlshort_layer_entries` (gauge): entries per compiled layer
//! - `urlshort_reloads_total` (counter): chain reloads by result
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op (tests, CLI)
//! - Labels are bounded: outcome, layer name, reload result

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const OUTCOME_REDIRECT: &str = "redirect";
pub const OUTCOME_FALLBACK: &str = "fallback";

/// `layer` label value for requests no layer resolved.
pub const FALLBACK_LAYER: &str = "fallback";

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched request. `layer` is the resolving layer, `None` for fallbacks.
pub fn record_request(outcome: &'static str, layer: Option<&str>, start: Instant) {
    metrics::counter!(
        "urlshort_requests_total",
        "outcome" => outcome,
        "layer" => layer.unwrap_or(FALLBACK_LAYER).to_string()
    )
    .increment(1);
    metrics::histogram!("urlshort_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_layer_entries(layer: &str, entries: usize) {
    metrics::gauge!("urlshort_layer_entries", "layer" => layer.to_string()).set(entries as f64);
}

pub fn record_reload(success: bool) {
    let result = if success { "ok" } else { "error" };
    metrics::counter!("urlshort_reloads_total", "result" => result).increment(1);
}
