//! # HR-03 Message Escrow - Per-topic Fee Custody
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (domain / ports / adapters)
//!
//! ## Purpose
//!
//! Accumulates the fees senders attach to escrow-enabled topics and releases
//! them in bulk: one ledger settlement splits the topic's total between the
//! topic recipient and the application owner.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Single authorized caller | `domain/escrow.rs` - `authorize()` |
//! | Deposits only for enabled topics | `domain/escrow.rs` - `record_deposit()` |
//! | Payee identity fixed by first deposit | `domain/entities.rs` - `EscrowPosition::matches()` |
//! | Total = sum of pending | `domain/entities.rs` - `EscrowPosition::credit()` |
//! | Release is all-or-nothing | `domain/escrow.rs` - settle, then clear |
//! | `recipient + app_owner == total` | `domain/value_objects.rs` - `SplitPolicy::split()` |
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `Ledger` | Moves released value to the payees |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod domain;
pub mod ports;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::InMemoryLedger;
    pub use crate::domain::{
        DepositRequest, EscrowCapability, EscrowPosition, MessageEscrow, Settlement,
        SplitPolicy, BPS_DENOMINATOR,
    };
    pub use crate::ports::{Ledger, LedgerError, Payout};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 3;
