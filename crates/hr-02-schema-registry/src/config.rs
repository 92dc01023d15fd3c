//! Configuration for the Schema Registry

use serde::{Deserialize, Serialize};

/// Schema registry policy and limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// When false, binding an already bound topic fails `AlreadyBound`.
    pub allow_rebind: bool,
    /// Maximum schema name length, in bytes.
    pub max_name_len: usize,
    /// Maximum description length, in bytes.
    pub max_description_len: usize,
    /// Maximum size of one version body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            allow_rebind: true,
            max_name_len: 128,
            max_description_len: 1024,
            max_body_bytes: 64 * 1024,
        }
    }
}
