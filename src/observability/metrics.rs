//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_server_requests_total` (counter): requests by method, route, status
//! - `config_server_request_duration_seconds` (histogram): latency distribution
//! - `config_server_reloads_total` (counter): reloads by scope and outcome
//! - `config_server_reload_duration_seconds` (histogram)
//! - `config_server_configs_loaded` (gauge): configs in the served snapshot

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("config_server_requests_total", &labels).increment(1);
    histogram!("config_server_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

pub fn record_reload(scope: &'static str, success: bool, start: Instant) {
    let outcome = if success { "success" } else { "failure" };
    counter!("config_server_reloads_total", "scope" => scope, "outcome" => outcome).increment(1);
    histogram!("config_server_reload_duration_seconds", "scope" => scope).record(start.elapsed().as_secs_f64());
}

pub fn record_configs_loaded(count: usize) {
    gauge!("config_server_configs_loaded").set(count as f64);
}
