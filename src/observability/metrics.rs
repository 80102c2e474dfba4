//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): forwarded calls by endpoint, upstream status
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency by endpoint
//! - `gateway_rejections_total` (counter): requests refused before forwarding, by kind
//!
//! Recording is a no-op until a recorder is installed, so handlers call these
//! unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            metrics::describe_counter!(
                "gateway_requests_total",
                "Requests forwarded upstream, by endpoint and status"
            );
            metrics::describe_histogram!(
                "gateway_request_duration_seconds",
                "Time from receiving a request to relaying the upstream reply"
            );
            metrics::describe_counter!(
                "gateway_rejections_total",
                "Requests refused before reaching upstream, by kind"
            );
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record a relayed upstream reply.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record a request refused before forwarding.
pub fn record_rejection(kind: &'static str) {
    metrics::counter!("gateway_rejections_total", "kind" => kind).increment(1);
}
