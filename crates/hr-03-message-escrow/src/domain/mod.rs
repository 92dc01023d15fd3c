//! # Domain Layer (Inner Hexagon)
//!
//! Escrow balances and the release split. NO I/O, NO async.

pub mod entities;
pub mod escrow;
pub mod value_objects;

pub use entities::*;
pub use escrow::MessageEscrow;
pub use value_objects::*;
