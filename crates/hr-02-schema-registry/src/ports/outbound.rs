//! # Outbound Ports
//!
//! The schema registry asks two questions of the topic registry: does the
//! topic exist, and is the caller a topic admin. Both go through the narrow
//! `TopicDirectory` trait so that no topic record crosses the boundary.

pub use hr_01_topic_registry::ports::TopicDirectory;

#[cfg(test)]
mod tests {
    use super::*;
    use hr_01_topic_registry::domain::PermissionLevel;
    use shared_types::{Address, TopicId};

    /// A directory with a fixed topic count and a single admin.
    struct StaticDirectory {
        topics: u64,
        admin: Address,
    }

    impl TopicDirectory for StaticDirectory {
        fn topic_count(&self) -> u64 {
            self.topics
        }

        fn topic_permissions(&self, topic: TopicId, user: &Address) -> PermissionLevel {
            if self.topic_exists(topic) && *user == self.admin {
                PermissionLevel::Admin
            } else {
                PermissionLevel::None
            }
        }
    }

    #[test]
    fn test_registry_accepts_any_directory() {
        use crate::config::SchemaConfig;
        use crate::domain::{SchemaRegistry, VersionSelector};

        let admin = Address::repeat_byte(7);
        let directory = StaticDirectory { topics: 3, admin };
        let mut schemas = SchemaRegistry::new(SchemaConfig::default(), Address::ZERO);
        let s = schemas
            .create_schema("s".into(), String::new(), "B1".into(), admin, 0)
            .unwrap();

        schemas
            .set_topic_schema(&directory, TopicId(3), s, VersionSelector::Latest, admin)
            .unwrap();
        assert!(schemas
            .set_topic_schema(&directory, TopicId(4), s, VersionSelector::Latest, admin)
            .is_err());
    }
}
