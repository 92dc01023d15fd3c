//! # Domain Layer (Inner Hexagon)
//!
//! Schema history and bindings. NO I/O, NO async.

pub mod entities;
pub mod registry;

pub use entities::*;
pub use registry::SchemaRegistry;
