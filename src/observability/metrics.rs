//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): dispatched requests by outcome
//! - `router_dispatch_duration_seconds` (histogram): time spent in the router
//!
//! Updates go through the `metrics` facade and cost nothing until a recorder
//! is installed (see [`init_metrics`]).

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// How a request left the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    NotFound,
    Halted,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Matched => "matched",
            Outcome::NotFound => "not_found",
            Outcome::Halted => "halted",
        }
    }
}

/// Record one dispatched request.
pub fn record_dispatch(outcome: Outcome, start: Instant) {
    counter!("router_requests_total", "outcome" => outcome.as_str()).increment(1);
    histogram!("router_dispatch_duration_seconds", "outcome" => outcome.as_str())
        .record(start.elapsed().as_secs_f64());
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}
