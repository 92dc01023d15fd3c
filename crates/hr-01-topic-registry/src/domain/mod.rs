//! # Domain Layer (Inner Hexagon)
//!
//! Pure registry logic. NO I/O, NO async.

pub mod entities;
pub mod permissions;
pub mod registry;
pub mod value_objects;

pub use entities::*;
pub use registry::TopicRegistry;
pub use value_objects::*;
