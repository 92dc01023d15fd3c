//! # Message Log
//!
//! Append-only store of recorded messages, indexed per topic.

use super::entities::Message;
use shared_types::{Address, IdSequence, MessageId, Timestamp, TopicId};
use std::collections::BTreeMap;

/// Append-only message store.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    messages: BTreeMap<MessageId, Message>,
    by_topic: BTreeMap<TopicId, Vec<MessageId>>,
    ids: IdSequence<MessageId>,
}

impl MessageLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message and returns it.
    pub fn append(
        &mut self,
        topic: TopicId,
        sender: Address,
        payload: Vec<u8>,
        recorded_at: Timestamp,
    ) -> &Message {
        let id = self.ids.allocate();
        let index = self.by_topic.entry(topic).or_default();
        index.push(id);
        let message = Message {
            id,
            topic,
            sender,
            payload,
            sequence: index.len() as u64,
            recorded_at,
        };
        self.messages.entry(id).or_insert(message)
    }

    /// Looks up a message by id.
    #[must_use]
    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.get(&id)
    }

    /// Messages of `topic` in sequence order.
    #[must_use]
    pub fn topic_messages(&self, topic: TopicId) -> Vec<&Message> {
        self.by_topic
            .get(&topic)
            .map(|ids| ids.iter().filter_map(|id| self.messages.get(id)).collect())
            .unwrap_or_default()
    }

    /// Number of messages recorded on `topic`.
    #[must_use]
    pub fn message_count(&self, topic: TopicId) -> u64 {
        self.by_topic.get(&topic).map_or(0, |ids| ids.len() as u64)
    }

    /// Number of messages recorded on all topics.
    #[must_use]
    pub fn total_messages(&self) -> u64 {
        self.ids.issued()
    }
}
