//! # Herald
//!
//! Loads a configuration file, initializes telemetry and brings up a Herald
//! instance over the in-memory ledger.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging and metrics from `HERALD_*` environment variables
//! 2. Load configuration (file, then `HERALD_REGISTRY_OWNER` /
//!    `HERALD_RECIPIENT_SHARE_BPS` overrides)
//! 3. Validate and build the state container
//! 4. Report the effective configuration and exit
//!
//! Usage: `herald [config.toml]` (defaults to `herald.toml`).

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use herald_runtime::adapters::SystemClock;
use herald_runtime::{Herald, HeraldConfig};
use herald_telemetry::TelemetryConfig;

fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    herald_telemetry::init_telemetry(&telemetry).context("failed to initialize telemetry")?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "herald.toml".to_string());
    let config = HeraldConfig::load(&path)
        .with_context(|| format!("failed to load configuration from {path}"))?;
    let (herald, _ledger) = Herald::in_memory(config, Arc::new(SystemClock))
        .context("invalid configuration")?;

    let config = herald.config();
    info!(
        service = %telemetry.service_name,
        version = herald_runtime::VERSION,
        registry_owner = %config.registry_owner,
        operator = %config.escrow.operator,
        recipient_share_bps = config.escrow.recipient_share_bps,
        allow_rebind = config.schema.allow_rebind,
        max_payload_bytes = config.limits.max_payload_bytes,
        "herald ready"
    );
    Ok(())
}
