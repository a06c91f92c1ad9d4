//! Metrics collection and exposition.
//!
//! # Metrics
//! - `notify_messages_routed_total` (counter): messages decoded and routed
//! - `notify_messages_skipped_total` (counter): by skip reason
//! - `notify_messages_dropped_total` (counter): by drop reason
//! - `notify_deliveries_total` (counter): by channel and terminal status
//! - `notify_delivery_retries_total` (counter): transient retries by channel
//!
//! # Design Decisions
//! - Low-overhead updates (atomic counters)
//! - Prometheus exposition is optional and config-gated

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exposition endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "failed to start metrics endpoint"),
    }
}

pub fn record_message_routed() {
    metrics::counter!("notify_messages_routed_total").increment(1);
}

pub fn record_message_skipped(reason: &'static str) {
    metrics::counter!("notify_messages_skipped_total", "reason" => reason).increment(1);
}

pub fn record_message_dropped(reason: &'static str) {
    metrics::counter!("notify_messages_dropped_total", "reason" => reason).increment(1);
}

pub fn record_delivery(channel: &str, status: &'static str) {
    metrics::counter!(
        "notify_deliveries_total",
        "channel" => channel.to_string(),
        "status" => status
    )
    .increment(1);
}

pub fn record_delivery_retry(channel: &str) {
    metrics::counter!(
        "notify_delivery_retries_total",
        "channel" => channel.to_string()
    )
    .increment(1);
}
