//! Metrics collection and exposition.
//!
//! # Metrics
//! - `freshproxy_requests_total` (counter): requests by route and status
//! - `freshproxy_request_duration_seconds` (histogram): latency by route
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus
//! exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!(
        "freshproxy_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("freshproxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}
