//! # Adapters Layer
//!
//! - `InMemoryLedger`: balance-map ledger for tests and embedded use.

pub mod in_memory_ledger;

pub use in_memory_ledger::InMemoryLedger;
