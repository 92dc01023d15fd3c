//! # Herald Configuration
//!
//! One configuration object for every subsystem, loaded from TOML with
//! environment overrides.
//!
//! ```toml
//! registry_owner = "0x00000000000000000000000000000000000000aa"
//!
//! [escrow]
//! recipient_share_bps = 7000
//! operator = "0x00000000000000000000000000000000000000ee"
//!
//! [schema]
//! allow_rebind = true
//!
//! [limits]
//! max_name_len = 128
//! max_payload_bytes = 65536
//! max_schema_body_bytes = 65536
//! max_description_len = 1024
//! max_journal_events = 65536
//! ```
//!
//! `escrow.recipient_share_bps` has no default and must be provided, either in
//! the file or through `HERALD_RECIPIENT_SHARE_BPS`.

use hr_01_topic_registry::config::RegistryConfig;
use hr_02_schema_registry::config::SchemaConfig;
use hr_04_message_dispatch::config::DispatchConfig;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Overrides `registry_owner`.
pub const ENV_REGISTRY_OWNER: &str = "HERALD_REGISTRY_OWNER";
/// Overrides `escrow.recipient_share_bps`.
pub const ENV_RECIPIENT_SHARE_BPS: &str = "HERALD_RECIPIENT_SHARE_BPS";

/// Complete Herald configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeraldConfig {
    /// May deactivate any schema.
    pub registry_owner: Address,
    /// Escrow configuration.
    pub escrow: EscrowConfig,
    /// Schema registry policy.
    pub schema: SchemaPolicy,
    /// Size limits.
    pub limits: LimitsConfig,
}

/// Escrow configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Recipient share of every release, in basis points (0..=10000). The
    /// application owner receives the rest.
    pub recipient_share_bps: u16,
    /// Identity the escrow capability is minted for.
    pub operator: Address,
}

/// Schema registry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaPolicy {
    /// When false, rebinding a bound topic fails `AlreadyBound`.
    pub allow_rebind: bool,
}

impl Default for SchemaPolicy {
    fn default() -> Self {
        Self { allow_rebind: true }
    }
}

/// Size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Application, topic and schema names, in bytes.
    pub max_name_len: usize,
    /// Message payloads, in bytes.
    pub max_payload_bytes: usize,
    /// One schema version body, in bytes.
    pub max_schema_body_bytes: usize,
    /// Schema descriptions, in bytes.
    pub max_description_len: usize,
    /// Undrained journal entries kept before the oldest are evicted.
    pub max_journal_events: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_name_len: 128,
            max_payload_bytes: 64 * 1024,
            max_schema_body_bytes: 64 * 1024,
            max_description_len: 1024,
            max_journal_events: 65_536,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// TOML parse error.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// A required value was given neither in the file nor the environment.
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {value}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
    },

    /// Split outside 0..=10000 basis points.
    #[error("recipient_share_bps must be at most 10000, got {0}")]
    InvalidSplit(u16),

    /// A size limit of zero.
    #[error("limit {0} must be positive")]
    InvalidLimit(&'static str),
}

// Raw file layout: everything optional so env overrides can fill gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    registry_owner: Option<Address>,
    #[serde(default)]
    escrow: EscrowSection,
    #[serde(default)]
    schema: SchemaPolicy,
    #[serde(default)]
    limits: LimitsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EscrowSection {
    recipient_share_bps: Option<u16>,
    operator: Option<Address>,
}

impl HeraldConfig {
    /// Configuration with default limits and policy. The escrow operator is
    /// the registry owner.
    #[must_use]
    pub fn new(registry_owner: Address, recipient_share_bps: u16) -> Self {
        Self {
            registry_owner,
            escrow: EscrowConfig {
                recipient_share_bps,
                operator: registry_owner,
            },
            schema: SchemaPolicy::default(),
            limits: LimitsConfig::default(),
        }
    }

    /// Parses TOML without consulting the environment.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::from_toml_str_with(content, |_| None)
    }

    /// Parses TOML, letting `lookup` override file values.
    pub fn from_toml_str_with(
        content: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let registry_owner = match lookup(ENV_REGISTRY_OWNER) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_REGISTRY_OWNER,
                value,
            })?,
            None => file.registry_owner.ok_or(ConfigError::Missing("registry_owner"))?,
        };
        let recipient_share_bps = match lookup(ENV_RECIPIENT_SHARE_BPS) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_RECIPIENT_SHARE_BPS,
                value,
            })?,
            None => file
                .escrow
                .recipient_share_bps
                .ok_or(ConfigError::Missing("escrow.recipient_share_bps"))?,
        };

        let config = Self {
            registry_owner,
            escrow: EscrowConfig {
                recipient_share_bps,
                operator: file.escrow.operator.unwrap_or(registry_owner),
            },
            schema: file.schema,
            limits: file.limits,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML file and applies `HERALD_*` environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml_str_with(&content, |key| std::env::var(key).ok())
    }

    /// Checks ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.escrow.recipient_share_bps > 10_000 {
            return Err(ConfigError::InvalidSplit(self.escrow.recipient_share_bps));
        }
        let limits = [
            ("max_name_len", self.limits.max_name_len),
            ("max_payload_bytes", self.limits.max_payload_bytes),
            ("max_schema_body_bytes", self.limits.max_schema_body_bytes),
            ("max_description_len", self.limits.max_description_len),
            ("max_journal_events", self.limits.max_journal_events),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::InvalidLimit(name));
            }
        }
        Ok(())
    }

    /// Topic registry slice.
    #[must_use]
    pub fn registry(&self) -> RegistryConfig {
        RegistryConfig {
            max_name_len: self.limits.max_name_len,
        }
    }

    /// Schema registry slice.
    #[must_use]
    pub fn schemas(&self) -> SchemaConfig {
        SchemaConfig {
            allow_rebind: self.schema.allow_rebind,
            max_name_len: self.limits.max_name_len,
            max_description_len: self.limits.max_description_len,
            max_body_bytes: self.limits.max_schema_body_bytes,
        }
    }

    /// Dispatch slice.
    #[must_use]
    pub fn dispatch(&self) -> DispatchConfig {
        DispatchConfig {
            max_payload_bytes: self.limits.max_payload_bytes,
        }
    }
}
