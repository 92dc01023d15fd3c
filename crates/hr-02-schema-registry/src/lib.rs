//! # HR-02 Schema Registry - Versioned Schemas and Topic Bindings
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (domain / ports)
//!
//! ## Purpose
//!
//! Stores named, versioned, human-readable descriptions of a topic's message
//! structure and binds topics to them. Bodies are opaque text; nothing here
//! parses or validates them.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Versions 1-based, gapless | `domain/entities.rs` - `Schema::push_version()` |
//! | `Latest` resolves at read time | `domain/registry.rs` - `topic_schema()` |
//! | Clear deletes the binding | `domain/registry.rs` - `clear_topic_schema()` |
//! | Inactive schema: no new versions or bindings | `domain/registry.rs` |
//!
//! ## Access Matrix
//!
//! | Operation | Required standing |
//! |-----------|-------------------|
//! | `create_schema` | anyone |
//! | `publish_schema_version` | schema creator |
//! | `set_topic_schema` / `clear_topic_schema` | topic admin (via `TopicDirectory`) |
//! | `deactivate_schema` | schema creator or registry owner |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod domain;
pub mod ports;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::SchemaConfig;
    pub use crate::domain::{
        Binding, ResolvedSchema, Schema, SchemaRegistry, SchemaVersion, VersionSelector,
    };
    pub use crate::ports::TopicDirectory;
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_id() {
        assert_eq!(SUBSYSTEM_ID, 2);
    }
}
