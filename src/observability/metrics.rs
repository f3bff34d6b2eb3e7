//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by verb class and outcome
//! - `router_request_duration_seconds` (histogram): dispatch latency
//! - `router_routes_registered` (gauge): routes in the live table
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels kept low-cardinality: no raw paths, and methods outside the
//!   routed verb classes collapse into `other`

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::VerbClass;

/// Outcome label for a dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    NotFound,
    Redirected,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Matched => "matched",
            Outcome::NotFound => "not_found",
            Outcome::Redirected => "redirected",
        }
    }
}

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Metric label for a request method.
pub fn method_label(method: &Method) -> &'static str {
    VerbClass::from_method(method).map_or("other", |verb| verb.as_str())
}

/// Record one dispatched request.
pub fn record_request(method: &Method, outcome: Outcome, start: Instant) {
    counter!(
        "router_requests_total",
        "method" => method_label(method),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    histogram!("router_request_duration_seconds", "outcome" => outcome.as_str())
        .record(start.elapsed().as_secs_f64());
}

/// Publish the size of the live route table.
pub fn set_routes_registered(count: usize) {
    gauge!("router_routes_registered").set(count as f64);
}
