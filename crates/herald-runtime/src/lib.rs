//! # Herald Runtime - State Container and Wiring
//!
//! **Architecture:** Single global state container over four subsystems
//!
//! ## Purpose
//!
//! Binds the topic registry, schema registry, message escrow and message
//! dispatch into one [`Herald`] value. Each public operation is atomic and
//! totally ordered with respect to every other operation.
//!
//! ## Execution Model
//!
//! | Property | Enforcement Location |
//! |----------|---------------------|
//! | One operation at a time, FIFO admission | `container/exclusive.rs` - `FairMutex` |
//! | Reentrant call fails instead of deadlocking | `container/exclusive.rs` - holder thread check |
//! | Failed operation has no effect | subsystems validate before mutating |
//! | Events appended only on success | `container/herald.rs` - journal push after the mutation |
//! | Escrow capability held by the container alone | `container/herald.rs` - private field |
//!
//! ## Usage Example
//!
//! ```ignore
//! use herald_runtime::prelude::*;
//!
//! let config = HeraldConfig::load("herald.toml")?;
//! let (herald, ledger) = Herald::in_memory(config, Arc::new(SystemClock))?;
//! let app = herald.create_application(owner, "chat")?;
//! let topic = herald.create_topic(app, TopicSpec::free("general", AccessLevel::Public), owner)?;
//! herald.send_message(SendMessage::free(topic, owner, b"hello".to_vec()))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod config;
pub mod container;
pub mod events;
pub mod ports;

pub use config::{ConfigError, HeraldConfig};
pub use container::Herald;
pub use events::{HeraldEvent, Journal};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{ManualClock, SystemClock};
    pub use crate::config::{ConfigError, EscrowConfig, HeraldConfig, LimitsConfig, SchemaPolicy};
    pub use crate::container::Herald;
    pub use crate::events::HeraldEvent;
    pub use crate::ports::Clock;
    pub use hr_01_topic_registry::prelude::{
        AccessLevel, FeePolicy, PermissionLevel, Role, RoleChange, RoleSet, TopicSpec,
    };
    pub use hr_02_schema_registry::prelude::{Binding, ResolvedSchema, VersionSelector};
    pub use hr_03_message_escrow::prelude::{InMemoryLedger, Ledger, LedgerError, Payout, Settlement};
    pub use hr_04_message_dispatch::prelude::{Message, Receipt, SendMessage};
    pub use shared_types::{Address, Amount, AppId, HeraldError, HeraldResult, SchemaId, Token, TopicId};
    pub use std::sync::Arc;
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
