//! # World State
//!
//! Every subsystem's state in one place, so one lock covers one operation
//! end to end.

use crate::config::HeraldConfig;
use crate::events::Journal;
use hr_01_topic_registry::domain::TopicRegistry;
use hr_02_schema_registry::domain::SchemaRegistry;
use hr_03_message_escrow::domain::{EscrowCapability, MessageEscrow, SplitPolicy};
use hr_04_message_dispatch::domain::MessageDispatch;
use shared_types::HeraldResult;

/// All Herald state.
#[derive(Debug)]
pub struct WorldState {
    /// Applications, topics, roles, permissions.
    pub registry: TopicRegistry,
    /// Schemas and topic bindings.
    pub schemas: SchemaRegistry,
    /// Escrowed fees.
    pub escrow: MessageEscrow,
    /// Message log.
    pub dispatch: MessageDispatch,
    /// Committed events not yet drained, bounded by
    /// `limits.max_journal_events`.
    pub journal: Journal,
}

impl WorldState {
    /// Builds empty state and the escrow capability bound to it.
    ///
    /// # Errors
    /// `InvalidSplit` for a split above 10 000 bps.
    pub fn new(config: &HeraldConfig) -> HeraldResult<(Self, EscrowCapability)> {
        let policy = SplitPolicy::new(config.escrow.recipient_share_bps)?;
        let (escrow, capability) = MessageEscrow::new(policy, config.escrow.operator);
        let world = Self {
            registry: TopicRegistry::new(config.registry()),
            schemas: SchemaRegistry::new(config.schemas(), config.registry_owner),
            escrow,
            dispatch: MessageDispatch::new(config.dispatch()),
            journal: Journal::new(config.limits.max_journal_events),
        };
        Ok((world, capability))
    }
}
