//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, MessageId, Timestamp, TopicId};

/// A recorded message. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Global id.
    pub id: MessageId,
    /// Destination topic.
    pub topic: TopicId,
    /// Author.
    pub sender: Address,
    /// Opaque bytes; never inspected.
    pub payload: Vec<u8>,
    /// Position within the topic, starting at 1.
    pub sequence: u64,
    /// Recording time.
    pub recorded_at: Timestamp,
}

/// A send request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendMessage {
    /// Destination topic.
    pub topic: TopicId,
    /// Author.
    pub sender: Address,
    /// Opaque bytes.
    pub payload: Vec<u8>,
    /// Fee attached to the call; zero for free topics.
    pub attached_fee: Amount,
}

impl SendMessage {
    /// A request with no attached fee.
    #[must_use]
    pub fn free(topic: TopicId, sender: Address, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic,
            sender,
            payload: payload.into(),
            attached_fee: Amount::zero(),
        }
    }

    /// Attaches a fee.
    #[must_use]
    pub fn with_fee(mut self, fee: Amount) -> Self {
        self.attached_fee = fee;
        self
    }
}

/// Result of a successful send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Id of the recorded message.
    pub message_id: MessageId,
    /// Its position within the topic.
    pub sequence: u64,
    /// Fee moved into escrow, for escrow-enabled topics.
    pub escrowed: Option<Amount>,
}
