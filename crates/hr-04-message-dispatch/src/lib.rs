//! # HR-04 Message Dispatch - Authorized Message Recording
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (domain / ports / adapters)
//!
//! ## Purpose
//!
//! The single write path for messages. A send is accepted only if the topic
//! exists, the sender passes the write check and the attached fee matches the
//! topic's fee policy exactly; escrowed fees are deposited before the message
//! is recorded. Payloads are opaque and never inspected.
//!
//! ## Outbound Dependencies
//!
//! | Port | Adapter | Purpose |
//! |------|---------|---------|
//! | `TopicGate` | `TopicRegistry` | Write terms and read checks |
//! | `FeeEscrow` | `CapabilityEscrow` | Capability-authenticated deposits |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::CapabilityEscrow;
    pub use crate::config::DispatchConfig;
    pub use crate::domain::{Message, MessageDispatch, MessageLog, Receipt, SendMessage};
    pub use crate::ports::{FeeEscrow, TopicGate, WriteTerms};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 4;
