//! Configuration for the Topic & Membership Registry

use serde::{Deserialize, Serialize};

/// Registry limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Maximum length of application and topic names, in bytes.
    pub max_name_len: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { max_name_len: 128 }
    }
}
