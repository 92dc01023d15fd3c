//! # Value Objects
//!
//! The release split policy and the operator capability.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, HeraldError, HeraldResult, U256};
use uuid::Uuid;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// How a released total is divided between the topic recipient and the
/// application owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPolicy {
    recipient_bps: u16,
}

impl SplitPolicy {
    /// `recipient_bps` is the recipient's share in basis points.
    ///
    /// # Errors
    /// `InvalidSplit` above 10 000.
    pub fn new(recipient_bps: u16) -> HeraldResult<Self> {
        if recipient_bps > BPS_DENOMINATOR {
            return Err(HeraldError::InvalidSplit(recipient_bps));
        }
        Ok(Self { recipient_bps })
    }

    /// Recipient share in basis points.
    #[must_use]
    pub const fn recipient_bps(&self) -> u16 {
        self.recipient_bps
    }

    /// Splits `total` into `(recipient, app_owner)`.
    ///
    /// The recipient share is `floor(total * bps / 10_000)`; the application
    /// owner takes the remainder, so the two always sum to `total`.
    #[must_use]
    pub fn split(&self, total: Amount) -> (Amount, Amount) {
        let denominator = U256::from(BPS_DENOMINATOR);
        let bps = U256::from(self.recipient_bps);
        // q * bps never exceeds total, and r * bps < 10_000 * 10_000.
        let (q, r) = total.div_mod(denominator);
        let recipient = q * bps + (r * bps) / denominator;
        (recipient, total - recipient)
    }
}

/// Proof that the holder is the escrow's single authorized caller.
///
/// Minted exactly once, when the escrow is constructed. It cannot be cloned
/// or built outside this crate.
#[derive(Debug, PartialEq, Eq)]
pub struct EscrowCapability {
    escrow_id: Uuid,
    holder: Address,
}

impl EscrowCapability {
    pub(crate) fn mint(escrow_id: Uuid, holder: Address) -> Self {
        Self { escrow_id, holder }
    }

    /// Escrow instance this capability was minted by.
    #[must_use]
    pub fn escrow_id(&self) -> Uuid {
        self.escrow_id
    }

    /// Identity the capability was minted for.
    #[must_use]
    pub fn holder(&self) -> Address {
        self.holder
    }
}
