//! # Ports Layer
//!
//! - **Driven Port (Outbound)**: `TopicDirectory`, implemented by the topic
//!   registry.

pub mod outbound;

pub use outbound::*;
