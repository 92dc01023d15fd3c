//! Configuration for Message Dispatch

use serde::{Deserialize, Serialize};

/// Dispatch limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Largest accepted payload, in bytes.
    pub max_payload_bytes: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 64 * 1024,
        }
    }
}
