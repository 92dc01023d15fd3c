//! Prometheus metrics for Herald.
//!
//! All metrics follow the naming convention: `herald_<subject>_<metric>_total`.

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // DISPATCH METRICS (Subsystem 4)
    // =========================================================================

    /// Messages recorded
    pub static ref MESSAGES_SENT: Counter = Counter::new(
        "herald_dispatch_messages_sent_total",
        "Total number of messages recorded"
    ).expect("metric creation failed");

    // =========================================================================
    // ESCROW METRICS (Subsystem 3)
    // =========================================================================

    /// Deposits accepted
    pub static ref ESCROW_DEPOSITS: Counter = Counter::new(
        "herald_escrow_deposits_total",
        "Total number of fee deposits accepted into escrow"
    ).expect("metric creation failed");

    /// Non-empty releases settled
    pub static ref ESCROW_RELEASES: Counter = Counter::new(
        "herald_escrow_releases_total",
        "Total number of escrow releases settled through the ledger"
    ).expect("metric creation failed");

    /// Value released, in smallest token units (approximate above 2^128)
    pub static ref ESCROW_VALUE_RELEASED: Counter = Counter::new(
        "herald_escrow_value_released_total",
        "Total escrowed value released to payees"
    ).expect("metric creation failed");

    // =========================================================================
    // SCHEMA METRICS (Subsystem 2)
    // =========================================================================

    /// Versions published after creation
    pub static ref SCHEMA_VERSIONS_PUBLISHED: Counter = Counter::new(
        "herald_schema_versions_published_total",
        "Total schema versions published"
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Rejected operations by operation and error kind
    pub static ref OPERATIONS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("herald_operations_rejected_total", "Total operations rejected"),
        &["operation", "kind"]
    ).expect("metric creation failed");
}

/// Register all metrics with [`REGISTRY`].
///
/// Fails with [`TelemetryError::MetricsInit`] if called twice.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Dispatch
        Box::new(MESSAGES_SENT.clone()),
        // Escrow
        Box::new(ESCROW_DEPOSITS.clone()),
        Box::new(ESCROW_RELEASES.clone()),
        Box::new(ESCROW_VALUE_RELEASED.clone()),
        // Schema
        Box::new(SCHEMA_VERSIONS_PUBLISHED.clone()),
        // Errors
        Box::new(OPERATIONS_REJECTED.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
}

/// Encode all registered metrics in the Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
