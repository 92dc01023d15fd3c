//! Cross-subsystem tests driven through `herald_runtime::Herald`.

pub mod atomicity;
pub mod properties;
pub mod scenarios;

use herald_runtime::prelude::*;

/// Registry owner used by every fixture.
pub const OWNER: Address = Address::repeat_byte(0x01);

/// Fresh Herald over an in-memory ledger with the given split.
pub fn herald_with_split(recipient_share_bps: u16) -> (Herald, Arc<InMemoryLedger>) {
    Herald::in_memory(
        HeraldConfig::new(OWNER, recipient_share_bps),
        Arc::new(ManualClock::new(1_700_000_000)),
    )
    .expect("valid fixture config")
}

/// Escrow fee policy in `token`.
pub fn fee(token: Token, amount: u64) -> FeePolicy {
    FeePolicy::Escrow {
        token,
        amount: Amount::from(amount),
    }
}
