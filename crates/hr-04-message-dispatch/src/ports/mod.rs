//! # Ports Layer
//!
//! - **Driven Ports (Outbound)**: `TopicGate`, `FeeEscrow`.

pub mod outbound;

pub use outbound::*;
