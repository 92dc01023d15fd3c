//! # Ports Layer
//!
//! - **Driven Port (Outbound)**: `Ledger`, the value-transfer collaborator.

pub mod outbound;

pub use outbound::*;
