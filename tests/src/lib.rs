//! # Herald Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenarios.rs   # End-to-end flows through the Herald container
//!     ├── properties.rs  # Property tests over arbitrary operation sequences
//!     └── atomicity.rs   # Failure isolation, reentrancy, concurrent callers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p herald-tests
//! cargo test -p herald-tests integration::properties
//! ```

#![allow(dead_code)]

pub mod integration;
