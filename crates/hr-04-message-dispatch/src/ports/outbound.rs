//! # Outbound Ports
//!
//! What dispatch needs from the topic registry and from the escrow.

use hr_01_topic_registry::domain::FeePolicy;
use hr_03_message_escrow::domain::DepositRequest;
use shared_types::{Address, Amount, HeraldResult, TopicId};

/// Everything dispatch must know about a topic to accept a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteTerms {
    /// Whether the sender may write.
    pub can_write: bool,
    /// Fee policy of the topic.
    pub fee: FeePolicy,
    /// Topic owner; receives the recipient share.
    pub recipient: Address,
    /// Owner of the topic's application.
    pub app_owner: Address,
}

/// Topic lookups - outbound port.
pub trait TopicGate {
    /// Write terms for `sender` on `topic`.
    ///
    /// # Errors
    /// `TopicNotFound` if the topic does not exist.
    fn write_terms(&self, topic: TopicId, sender: &Address) -> HeraldResult<WriteTerms>;

    /// Read check for `reader` on `topic`.
    ///
    /// # Errors
    /// `TopicNotFound` if the topic does not exist.
    fn can_read(&self, topic: TopicId, reader: &Address) -> HeraldResult<bool>;
}

/// Fee custody - outbound port.
pub trait FeeEscrow {
    /// Moves one validated fee into escrow. Returns the topic's new total.
    fn deposit(&mut self, request: DepositRequest) -> HeraldResult<Amount>;
}
