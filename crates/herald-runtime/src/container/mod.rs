//! # State Container
//!
//! `Herald` owns the world state behind one fair lock and exposes every
//! operation of every subsystem.

pub mod exclusive;
pub mod herald;
pub mod world;

pub use exclusive::{Exclusive, Session};
pub use herald::Herald;
pub use world::WorldState;
