//! # HR-01 Topic Registry - Applications, Topics, Membership
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (domain / ports)
//!
//! ## Purpose
//!
//! Owns every application, topic, member role and topic permission record,
//! and answers the read/write/admin questions the rest of Herald asks.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Application owner is an implicit admin | `domain/entities.rs` - `Application::is_admin()` |
//! | Topic `app_id` immutable | `domain/entities.rs` - no setter |
//! | Absent permission = `None` | `domain/entities.rs` - `Topic::permission_of()` |
//! | Ids monotonic, never reused | `shared_types::IdSequence` |
//! | Failed check leaves state unchanged | `domain/registry.rs` - validate before write |
//!
//! ## Access Matrix
//!
//! | Operation | Required standing |
//! |-----------|-------------------|
//! | `create_topic` | application admin |
//! | `set_role` | application admin |
//! | `set_topic_permission` | topic admin |
//! | `set_topic_access_level` | topic admin |
//!
//! ## Usage Example
//!
//! ```ignore
//! use hr_01_topic_registry::prelude::*;
//!
//! let mut registry = TopicRegistry::new(RegistryConfig::default());
//! let app = registry.create_application(owner, "chat".into(), now)?;
//! let topic = registry.create_topic(app, TopicSpec::free("general", AccessLevel::Public), owner, now)?;
//! assert!(registry.can_write(topic, &anyone)?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod domain;
pub mod ports;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::RegistryConfig;
    pub use crate::domain::permissions::{can_read, can_write, effective_permission, is_topic_admin};
    pub use crate::domain::{
        AccessLevel, Application, FeePolicy, PermissionLevel, Role, RoleChange, RoleSet, Topic,
        TopicRegistry, TopicSpec,
    };
    pub use crate::ports::TopicDirectory;
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 1;
