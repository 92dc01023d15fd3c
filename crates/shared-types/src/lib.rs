//! # Shared Types Crate
//!
//! Identifiers, addresses, amounts and the error taxonomy used by every
//! Herald subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Ids by value**: Subsystems reference each other's records by id only,
//!   never by live reference.
//! - **One taxonomy**: Every failure surfaces as a [`HeraldError`] carrying the
//!   entity ids involved and nothing else.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
