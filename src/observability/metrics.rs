//! Metrics collection and exposition.
//!
//! # Metrics
//! - `prerender_decisions_total` (counter): classifier results by `decision`
//! - `prerender_upstream_requests_total` (counter): service calls by `status`
//! - `prerender_upstream_duration_seconds` (histogram): service latency
//! - `prerender_fallbacks_total` (counter): service 5xx handed back to the host
//! - `prerender_relay_errors_total` (counter): failed relays by `kind`
//! - `prerender_transcodes_total` (counter): body translations by `direction`

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(prerender: bool) {
    let decision = if prerender { "prerender" } else { "skip" };
    counter!("prerender_decisions_total", "decision" => decision).increment(1);
}

pub fn record_upstream(status: u16, start: Instant) {
    counter!("prerender_upstream_requests_total", "status" => status.to_string()).increment(1);
    histogram!("prerender_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_fallback() {
    counter!("prerender_fallbacks_total").increment(1);
}

pub fn record_relay_error(kind: &'static str) {
    counter!("prerender_relay_errors_total", "kind" => kind).increment(1);
}

pub fn record_transcode(direction: &'static str) {
    counter!("prerender_transcodes_total", "direction" => direction).increment(1);
}
