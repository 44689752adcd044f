//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hc_reconcile_operations_total` (counter): store-facing operations by op, result
//! - `hc_sync_passes_total` (counter): controller passes by result
//! - `hc_desired_health_checks` (gauge): ports currently desired
//!
//! Recording is a no-op until a recorder is installed.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_operation(op: &'static str, result: &'static str) {
    ::metrics::counter!("hc_reconcile_operations_total", "op" => op, "result" => result).increment(1);
}

pub fn record_pass(result: &'static str) {
    ::metrics::counter!("hc_sync_passes_total", "result" => result).increment(1);
}

pub fn record_desired(count: usize) {
    ::metrics::gauge!("hc_desired_health_checks").set(count as f64);
}
