//! `TopicGate` over the topic registry.

use crate::ports::{TopicGate, WriteTerms};
use hr_01_topic_registry::domain::TopicRegistry;
use shared_types::{Address, HeraldResult, TopicId};

impl TopicGate for TopicRegistry {
    fn write_terms(&self, topic: TopicId, sender: &Address) -> HeraldResult<WriteTerms> {
        let (app, record) = self.topic_with_app(topic)?;
        Ok(WriteTerms {
            can_write: hr_01_topic_registry::domain::permissions::can_write(app, record, sender),
            fee: record.fee,
            recipient: record.owner,
            app_owner: app.owner,
        })
    }

    fn can_read(&self, topic: TopicId, reader: &Address) -> HeraldResult<bool> {
        TopicRegistry::can_read(self, topic, reader)
    }
}
