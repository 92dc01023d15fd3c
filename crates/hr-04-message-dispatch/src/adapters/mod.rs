//! # Adapters Layer
//!
//! Bind the outbound ports to the topic registry and the escrow.

pub mod escrow_adapter;
pub mod registry_adapter;

pub use escrow_adapter::CapabilityEscrow;
