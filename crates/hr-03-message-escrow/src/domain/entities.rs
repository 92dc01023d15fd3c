//! # Domain Entities

use crate::ports::Payout;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, Token, TopicId};
use std::collections::BTreeMap;

/// Escrowed balance of one topic.
///
/// The first deposit fixes `token`, `recipient` and `app_owner`; they do not
/// change afterwards, including across releases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowPosition {
    /// Fee token.
    pub token: Token,
    /// Receives the recipient share on release.
    pub recipient: Address,
    /// Receives the remainder on release.
    pub app_owner: Address,
    pending: BTreeMap<Address, Amount>,
    total: Amount,
}

impl EscrowPosition {
    pub(crate) fn open(token: Token, recipient: Address, app_owner: Address) -> Self {
        Self {
            token,
            recipient,
            app_owner,
            pending: BTreeMap::new(),
            total: Amount::zero(),
        }
    }

    /// Pending amount deposited by `sender` since the last release.
    #[must_use]
    pub fn pending_of(&self, sender: &Address) -> Amount {
        self.pending.get(sender).copied().unwrap_or_default()
    }

    /// Sum of every sender's pending amount.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.total
    }

    /// Senders with a non-zero pending amount.
    pub fn depositors(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.pending.iter()
    }

    /// True if the payee identity matches the one this position was opened with.
    #[must_use]
    pub fn matches(&self, token: Token, recipient: &Address, app_owner: &Address) -> bool {
        self.token == token && self.recipient == *recipient && self.app_owner == *app_owner
    }

    /// Adds `amount` for `sender`. Returns the new topic total, or `None`
    /// (leaving the position untouched) on overflow.
    pub(crate) fn credit(&mut self, sender: Address, amount: Amount) -> Option<Amount> {
        // A sender's pending never exceeds the total, so one check covers both.
        let total = self.total.checked_add(amount)?;
        let entry = self.pending.entry(sender).or_default();
        *entry += amount;
        self.total = total;
        Some(total)
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
        self.total = Amount::zero();
    }
}

/// A deposit as asserted by the dispatch component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositRequest {
    /// Topic key.
    pub topic: TopicId,
    /// Paying sender.
    pub sender: Address,
    /// Fee token.
    pub token: Token,
    /// Deposited amount; must be non-zero.
    pub amount: Amount,
    /// Topic owner.
    pub recipient: Address,
    /// Owner of the topic's application.
    pub app_owner: Address,
}

/// Outcome of a non-empty release.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Released topic.
    pub topic: TopicId,
    /// Token the payouts are denominated in.
    pub token: Token,
    /// Sum released.
    pub total: Amount,
    /// Non-zero payouts, recipient first.
    pub payouts: Vec<Payout>,
    /// Number of distinct senders whose balances were cleared.
    pub senders: usize,
}
