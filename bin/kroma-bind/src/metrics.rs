//! Prometheus metrics for contract interactions.
//!
//! All metrics are aggregated in the [`Metrics`] struct and labelled by
//! contract and method or event name.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Aggregated metrics for the CLI.
///
/// Metrics are registered with the global metrics registry on creation.
/// Without an installed recorder every call is a no-op.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "kroma_bind_calls_total",
            "Total number of read-only contract calls"
        );
        describe_counter!(
            "kroma_bind_call_failures_total",
            "Total number of failed contract calls"
        );
        describe_histogram!(
            "kroma_bind_call_duration_seconds",
            "Duration of each contract call in seconds"
        );

        describe_counter!(
            "kroma_bind_transactions_total",
            "Total number of transactions submitted"
        );
        describe_counter!(
            "kroma_bind_transaction_failures_total",
            "Total number of transactions that failed before submission completed"
        );

        describe_counter!(
            "kroma_bind_events_total",
            "Total number of decoded events delivered"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Calls
    // ─────────────────────────────────────────────────────────────────────────────

    /// Record a completed call.
    pub fn record_call(&self, contract: &str, method: &str, success: bool, duration: Duration) {
        let labels = [
            ("contract", contract.to_string()),
            ("method", method.to_string()),
        ];
        counter!("kroma_bind_calls_total", &labels).increment(1);
        histogram!("kroma_bind_call_duration_seconds", &labels).record(duration.as_secs_f64());

        if !success {
            counter!("kroma_bind_call_failures_total", &labels).increment(1);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn record_transaction(&self, contract: &str, method: &str, success: bool) {
        let labels = [
            ("contract", contract.to_string()),
            ("method", method.to_string()),
        ];
        if success {
            counter!("kroma_bind_transactions_total", &labels).increment(1);
        } else {
            counter!("kroma_bind_transaction_failures_total", &labels).increment(1);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn record_event(&self, contract: &str, event: &str) {
        counter!(
            "kroma_bind_events_total",
            "contract" => contract.to_string(),
            "event" => event.to_string()
        )
        .increment(1);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
