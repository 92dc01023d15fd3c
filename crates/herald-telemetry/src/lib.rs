//! # Herald Telemetry
//!
//! Structured logging and Prometheus metrics for the Herald subsystems.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use herald_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Operations now log through `tracing` and count into Prometheus.
//!     println!("{}", herald_telemetry::gather_metrics()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HERALD_LOG_LEVEL` | `RUST_LOG`, then `info` | Log filter |
//! | `HERALD_JSON_LOGS` | `false` | JSON formatted logs |
//! | `HERALD_CONSOLE_OUTPUT` | `true` | Emit logs at all |
//! | `HERALD_SERVICE_NAME` | `herald` | Service name in the startup line |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, ESCROW_DEPOSITS, ESCROW_RELEASES, ESCROW_VALUE_RELEASED,
    MESSAGES_SENT, OPERATIONS_REJECTED, SCHEMA_VERSIONS_PUBLISHED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("logging already initialized")]
    AlreadyInitialized,

    /// The log filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    /// Metric registration or encoding failed.
    #[error("failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and register metrics.
///
/// Logging goes first, so a repeated call fails with
/// [`TelemetryError::AlreadyInitialized`] before touching the registry.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)?;
    register_metrics()
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
