//! In-memory Ledger Adapter
//!
//! Implements the `Ledger` port over a balance map.

use crate::ports::{Ledger, LedgerError, Payout};
use parking_lot::RwLock;
use shared_types::{Address, Amount, Token};
use std::collections::HashMap;
use tracing::{debug, info};

/// In-memory ledger.
///
/// Credits payouts to per-(token, address) balances. A failure can be armed
/// with [`InMemoryLedger::fail_next`] to exercise the abort path.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<(Token, Address), Amount>>,
    settlements: RwLock<Vec<(Token, Vec<Payout>)>>,
    fail_next: RwLock<Option<String>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `settle` call fail with `reason`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        *self.fail_next.write() = Some(reason.into());
    }

    /// Balance credited to `owner` in `token`.
    #[must_use]
    pub fn balance_of(&self, token: Token, owner: &Address) -> Amount {
        self.balances
            .read()
            .get(&(token, *owner))
            .copied()
            .unwrap_or_default()
    }

    /// Number of successful settlements.
    #[must_use]
    pub fn settlement_count(&self) -> usize {
        self.settlements.read().len()
    }

    /// Successful settlements in order.
    #[must_use]
    pub fn settlements(&self) -> Vec<(Token, Vec<Payout>)> {
        self.settlements.read().clone()
    }
}

impl Ledger for InMemoryLedger {
    fn settle(&self, token: Token, payouts: &[Payout]) -> Result<(), LedgerError> {
        if let Some(reason) = self.fail_next.write().take() {
            debug!(%token, %reason, "settlement failure injected");
            return Err(LedgerError::Rejected(reason));
        }

        let mut balances = self.balances.write();
        // Check every credit before applying any of them.
        // A payee may appear more than once; credits accumulate per key.
        let mut staged: HashMap<(Token, Address), Amount> = HashMap::with_capacity(payouts.len());
        for payout in payouts {
            let key = (token, payout.to);
            let current = match staged.get(&key) {
                Some(balance) => *balance,
                None => balances.get(&key).copied().unwrap_or_default(),
            };
            let next = current
                .checked_add(payout.amount)
                .ok_or_else(|| LedgerError::Rejected(format!("balance overflow for {}", payout.to)))?;
            staged.insert(key, next);
        }
        for (key, next) in staged {
            balances.insert(key, next);
        }
        drop(balances);

        info!(%token, payouts = payouts.len(), "settlement applied");
        self.settlements.write().push((token, payouts.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::U256;

    #[test]
    fn test_settle_credits_balances() {
        let ledger = InMemoryLedger::new();
        let a = Address::repeat_byte(1);
        ledger
            .settle(
                Token::NATIVE,
                &[Payout {
                    to: a,
                    amount: U256::from(5),
                }],
            )
            .unwrap();
        assert_eq!(ledger.balance_of(Token::NATIVE, &a), U256::from(5));
        assert_eq!(ledger.settlement_count(), 1);
    }

    #[test]
    fn test_repeated_payee_receives_every_credit() {
        let ledger = InMemoryLedger::new();
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        ledger
            .settle(Token::NATIVE, &[Payout { to: b, amount: U256::from(1) }])
            .unwrap();
        ledger
            .settle(
                Token::NATIVE,
                &[
                    Payout { to: a, amount: U256::from(15) },
                    Payout { to: b, amount: U256::from(4) },
                    Payout { to: a, amount: U256::from(15) },
                ],
            )
            .unwrap();
        assert_eq!(ledger.balance_of(Token::NATIVE, &a), U256::from(30));
        assert_eq!(ledger.balance_of(Token::NATIVE, &b), U256::from(5));
    }

    #[test]
    fn test_overflow_rejects_whole_settlement() {
        let ledger = InMemoryLedger::new();
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let result = ledger.settle(
            Token::NATIVE,
            &[
                Payout { to: b, amount: U256::from(3) },
                Payout { to: a, amount: U256::MAX },
                Payout { to: a, amount: U256::one() },
            ],
        );
        assert!(matches!(result, Err(LedgerError::Rejected(_))));
        assert!(ledger.balance_of(Token::NATIVE, &b).is_zero());
        assert!(ledger.balance_of(Token::NATIVE, &a).is_zero());
        assert_eq!(ledger.settlement_count(), 0);
    }

    #[test]
    fn test_injected_failure_is_one_shot() {
        let ledger = InMemoryLedger::new();
        ledger.fail_next("down");
        assert_eq!(
            ledger.settle(Token::NATIVE, &[]),
            Err(LedgerError::Rejected("down".into()))
        );
        assert!(ledger.settle(Token::NATIVE, &[]).is_ok());
    }
}
