//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define registry metrics (registrations, heartbeats, evictions, writes)
//! - Expose Prometheus-compatible metrics endpoint when enabled
//!
//! # Metrics
//! - `devroute_registrations_total` (counter): register calls by outcome
//! - `devroute_heartbeats_total` (counter): heartbeat calls by outcome
//! - `devroute_unregistrations_total` (counter): unregister calls by outcome
//! - `devroute_expired_clients_total` (counter): clients evicted by the sweeper
//! - `devroute_live_clients` (gauge): current registry size
//! - `devroute_config_writes_total` (counter): artifact writes by result
//! - `devroute_config_write_duration_seconds` (histogram): publish latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_registration(outcome: &'static str) {
    counter!("devroute_registrations_total", "outcome" => outcome).increment(1);
}

pub fn record_heartbeat(outcome: &'static str) {
    counter!("devroute_heartbeats_total", "outcome" => outcome).increment(1);
}

pub fn record_unregistration(outcome: &'static str) {
    counter!("devroute_unregistrations_total", "outcome" => outcome).increment(1);
}

pub fn record_expired(count: usize) {
    counter!("devroute_expired_clients_total").increment(count as u64);
}

pub fn set_live_clients(count: usize) {
    gauge!("devroute_live_clients").set(count as f64);
}

pub fn record_config_write(result: &'static str, start: Instant) {
    counter!("devroute_config_writes_total", "result" => result).increment(1);
    histogram!("devroute_config_write_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_config_write_failure() {
    counter!("devroute_config_writes_total", "result" => "failed").increment(1);
}
