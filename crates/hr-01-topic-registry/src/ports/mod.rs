//! # Ports Layer
//!
//! - **Driving Port (Inbound)**: `TopicDirectory`, the narrow view other
//!   subsystems use to check topic standing without the full topic record.

pub mod inbound;

pub use inbound::*;
