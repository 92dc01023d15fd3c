//! # Outbound Ports
//!
//! The external ledger that actually moves value when escrow is released.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, Token};
use thiserror::Error;

/// One transfer out of escrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Beneficiary.
    pub to: Address,
    /// Amount in the smallest unit of the token.
    pub amount: Amount,
}

/// Why the ledger refused a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ledger declined the transfer.
    #[error("settlement rejected: {0}")]
    Rejected(String),

    /// The ledger does not know the token.
    #[error("unsupported token: {0}")]
    UnsupportedToken(String),
}

/// External ledger - outbound port.
///
/// `settle` must be all-or-nothing: on error, no payout was applied.
/// Implementations are called while the caller holds exclusive access to
/// Herald state and must not call back into it.
pub trait Ledger: Send + Sync {
    /// Transfers every payout in `token`, or none of them.
    fn settle(&self, token: Token, payouts: &[Payout]) -> Result<(), LedgerError>;
}
