//! # Driving Ports (API - Inbound)
//!
//! The narrow interface the registry exposes to other subsystems.
//!
//! Consumers (the schema registry) need two facts: does a topic exist, and
//! what standing does a user have on it. They get those without marshaling
//! the full `Topic` record.

use crate::domain::value_objects::PermissionLevel;
use crate::domain::TopicRegistry;
use shared_types::{Address, TopicId};

/// Read-only topic directory.
pub trait TopicDirectory {
    /// Number of topics ever created. Ids are `1..=topic_count()`.
    fn topic_count(&self) -> u64;

    /// Effective level of `user` on `topic`: `Admin` whenever the user has
    /// topic-admin standing, otherwise the explicit grant. Unknown topics
    /// report `None`.
    fn topic_permissions(&self, topic: TopicId, user: &Address) -> PermissionLevel;

    /// True if `topic` was ever created.
    fn topic_exists(&self, topic: TopicId) -> bool {
        (1..=self.topic_count()).contains(&topic.get())
    }

    /// True if `user` has topic-admin standing.
    fn is_topic_admin(&self, topic: TopicId, user: &Address) -> bool {
        self.topic_permissions(topic, user) == PermissionLevel::Admin
    }
}

impl TopicDirectory for TopicRegistry {
    fn topic_count(&self) -> u64 {
        TopicRegistry::topic_count(self)
    }

    fn topic_permissions(&self, topic: TopicId, user: &Address) -> PermissionLevel {
        self.effective_permission(topic, user).unwrap_or_default()
    }
}
