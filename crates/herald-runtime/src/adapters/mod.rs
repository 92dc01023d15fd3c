//! # Adapters
//!
//! - `SystemClock` / `ManualClock`: `Clock` implementations.

pub mod clock;

pub use clock::{ManualClock, SystemClock};
