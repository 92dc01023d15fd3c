//! # Message Escrow
//!
//! Holds fees collected on escrow-enabled topics until a bulk release splits
//! them between the topic recipient and the application owner.
//!
//! ## Invariants Enforced
//!
//! - Only the holder of this instance's [`EscrowCapability`] may enable
//!   topics, deposit or release.
//! - Deposits are rejected for topics never enabled.
//! - A topic's token and payees are fixed by its first deposit.
//! - Release settles through the ledger first and clears only on success.

use super::entities::{DepositRequest, EscrowPosition, Settlement};
use super::value_objects::{EscrowCapability, SplitPolicy};
use crate::ports::{Ledger, Payout};
use shared_types::{Address, Amount, HeraldError, HeraldResult, Scope, TopicId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Escrow state.
#[derive(Debug)]
pub struct MessageEscrow {
    id: Uuid,
    operator: Address,
    policy: SplitPolicy,
    enabled: BTreeSet<TopicId>,
    positions: BTreeMap<TopicId, EscrowPosition>,
}

impl MessageEscrow {
    /// Creates an escrow and the one capability that can drive it.
    #[must_use]
    pub fn new(policy: SplitPolicy, operator: Address) -> (Self, EscrowCapability) {
        let id = Uuid::new_v4();
        let escrow = Self {
            id,
            operator,
            policy,
            enabled: BTreeSet::new(),
            positions: BTreeMap::new(),
        };
        info!(escrow_id = %id, operator = %operator, recipient_bps = policy.recipient_bps(), "escrow created");
        (escrow, EscrowCapability::mint(id, operator))
    }

    /// Instance id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Configured split.
    #[must_use]
    pub fn policy(&self) -> SplitPolicy {
        self.policy
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Records that `topic` collects fees. Idempotent.
    ///
    /// # Errors
    /// `Unauthorized` for a foreign capability.
    pub fn enable_topic(&mut self, cap: &EscrowCapability, topic: TopicId) -> HeraldResult<()> {
        self.authorize(cap)?;
        if self.enabled.insert(topic) {
            debug!(topic_id = %topic, "escrow enabled for topic");
        }
        Ok(())
    }

    /// Accumulates a deposit. Returns the topic's new pending total.
    ///
    /// # Errors
    /// - `Unauthorized` for a foreign capability
    /// - `EscrowDisabled` if the topic was never enabled
    /// - `ZeroAmount`
    /// - `EscrowConfigMismatch` if token or payees differ from the first deposit
    /// - `AmountOverflow`
    pub fn record_deposit(
        &mut self,
        cap: &EscrowCapability,
        request: DepositRequest,
    ) -> HeraldResult<Amount> {
        self.authorize(cap)?;
        let DepositRequest {
            topic,
            sender,
            token,
            amount,
            recipient,
            app_owner,
        } = request;

        if !self.enabled.contains(&topic) {
            warn!(topic_id = %topic, "deposit for topic never enabled");
            return Err(HeraldError::EscrowDisabled(topic));
        }
        if amount.is_zero() {
            return Err(HeraldError::ZeroAmount);
        }
        if let Some(position) = self.positions.get(&topic) {
            if !position.matches(token, &recipient, &app_owner) {
                warn!(topic_id = %topic, "deposit payee/token mismatch");
                return Err(HeraldError::EscrowConfigMismatch(topic));
            }
        }

        let position = self
            .positions
            .entry(topic)
            .or_insert_with(|| EscrowPosition::open(token, recipient, app_owner));
        // A freshly opened position starts at zero and cannot overflow here.
        let total = position
            .credit(sender, amount)
            .ok_or(HeraldError::AmountOverflow(topic))?;
        info!(topic_id = %topic, sender = %sender, %amount, %total, "deposit recorded");
        Ok(total)
    }

    /// Releases everything pending on `topic`. `Ok(None)` when nothing was
    /// pending; no ledger call is made in that case.
    ///
    /// # Errors
    /// - `Unauthorized` for a foreign capability
    /// - `LedgerFailure` if settlement fails; balances are left intact
    pub fn release_for_topic(
        &mut self,
        cap: &EscrowCapability,
        topic: TopicId,
        ledger: &dyn Ledger,
    ) -> HeraldResult<Option<Settlement>> {
        self.authorize(cap)?;
        let Some(position) = self.positions.get_mut(&topic) else {
            debug!(topic_id = %topic, "release with no position");
            return Ok(None);
        };
        let total = position.total();
        if total.is_zero() {
            debug!(topic_id = %topic, "release with nothing pending");
            return Ok(None);
        }

        let (recipient_share, owner_share) = self.policy.split(total);
        let payouts: Vec<Payout> = [
            Payout {
                to: position.recipient,
                amount: recipient_share,
            },
            Payout {
                to: position.app_owner,
                amount: owner_share,
            },
        ]
        .into_iter()
        .filter(|p| !p.amount.is_zero())
        .collect();

        if let Err(e) = ledger.settle(position.token, &payouts) {
            error!(topic_id = %topic, error = %e, "escrow settlement failed");
            return Err(HeraldError::LedgerFailure {
                topic,
                reason: e.to_string(),
            });
        }

        let settlement = Settlement {
            topic,
            token: position.token,
            total,
            payouts,
            senders: position.depositors().count(),
        };
        position.clear();
        info!(topic_id = %topic, %total, senders = settlement.senders, "escrow released");
        Ok(Some(settlement))
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// True if `topic` was ever enabled.
    #[must_use]
    pub fn is_escrow_enabled(&self, topic: TopicId) -> bool {
        self.enabled.contains(&topic)
    }

    /// Pending amount of `sender` on `topic`.
    #[must_use]
    pub fn pending(&self, topic: TopicId, sender: &Address) -> Amount {
        self.positions
            .get(&topic)
            .map(|p| p.pending_of(sender))
            .unwrap_or_default()
    }

    /// Pending total on `topic`.
    #[must_use]
    pub fn total_pending(&self, topic: TopicId) -> Amount {
        self.positions
            .get(&topic)
            .map(EscrowPosition::total)
            .unwrap_or_default()
    }

    /// The topic's position, once a first deposit opened it.
    #[must_use]
    pub fn position(&self, topic: TopicId) -> Option<&EscrowPosition> {
        self.positions.get(&topic)
    }

    /// Fails `Unauthorized` unless `cap` was minted by this escrow.
    pub fn authorize(&self, cap: &EscrowCapability) -> HeraldResult<()> {
        if cap.escrow_id() != self.id || cap.holder() != self.operator {
            warn!(escrow_id = %self.id, presented = %cap.escrow_id(), "foreign escrow capability");
            return Err(HeraldError::unauthorized(cap.holder(), Scope::Escrow));
        }
        Ok(())
    }
}
