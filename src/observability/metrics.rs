//! Metrics collection and exposition.
//!
//! # Metrics
//! - `routerunner_dispatch_total` (counter): dispatches by method, outcome
//!   (`method` is `GET`, `POST` or `other`; request methods are client-chosen)
//! - `routerunner_dispatch_duration_seconds` (histogram): dispatch latency
//! - `routerunner_route_loads_total` (counter): table loads by origin
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Label value for a request method, bounded to the route grammar's verbs.
pub fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        _ => "other",
    }
}

/// Record one `Router::execute` call.
pub fn record_dispatch(method: &str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "routerunner_dispatch_total",
        "method" => method_label(method),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("routerunner_dispatch_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record where a route table came from.
pub fn record_route_load(origin: &'static str) {
    metrics::counter!("routerunner_route_loads_total", "origin" => origin).increment(1);
}
