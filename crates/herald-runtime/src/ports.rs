//! # Outbound Ports
//!
//! Runtime collaborators supplied by the embedder.

use shared_types::Timestamp;

/// Time source - outbound port.
///
/// Timestamps are recorded on applications, topics, schemas and messages but
/// never drive control flow.
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds.
    fn now(&self) -> Timestamp;
}
