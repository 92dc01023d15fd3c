//! # Domain Layer (Inner Hexagon)
//!
//! Send orchestration and the message log. NO I/O, NO async.

pub mod dispatch;
pub mod entities;
pub mod log;

pub use dispatch::MessageDispatch;
pub use entities::*;
pub use log::MessageLog;
