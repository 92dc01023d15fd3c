//! `FeeEscrow` over the message escrow, authenticated by its capability.

use crate::ports::FeeEscrow;
use hr_03_message_escrow::domain::{DepositRequest, EscrowCapability, MessageEscrow};
use shared_types::{Amount, HeraldResult};

/// Pairs the escrow with the capability that authorizes deposits.
pub struct CapabilityEscrow<'a> {
    escrow: &'a mut MessageEscrow,
    capability: &'a EscrowCapability,
}

impl<'a> CapabilityEscrow<'a> {
    /// Borrows the escrow for one operation.
    pub fn new(escrow: &'a mut MessageEscrow, capability: &'a EscrowCapability) -> Self {
        Self { escrow, capability }
    }
}

impl FeeEscrow for CapabilityEscrow<'_> {
    fn deposit(&mut self, request: DepositRequest) -> HeraldResult<Amount> {
        self.escrow.record_deposit(self.capability, request)
    }
}
