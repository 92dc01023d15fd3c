//! # End-to-end Scenarios
//!
//! Flows that cross at least two subsystems, run through the `Herald`
//! container exactly as an embedding application would.
//!
//! 1. **Floating schema binding**: a topic bound to "latest" follows new
//!    versions without rebinding.
//! 2. **Escrow release**: deposits from several senders are split between the
//!    topic recipient and the application owner.
//! 3. **Private topic grant**: a write permission turns a rejected send into
//!    an accepted one.

#[cfg(test)]
mod tests {
    use super::super::{fee, herald_with_split, OWNER};
    use herald_runtime::prelude::*;
    use shared_types::{ErrorKind, Scope};

    const RECIPIENT: Address = Address::repeat_byte(0x0A);
    const S1: Address = Address::repeat_byte(0x51);
    const S2: Address = Address::repeat_byte(0x52);
    const U: Address = Address::repeat_byte(0x55);
    const AUTHOR: Address = Address::repeat_byte(0xA0);

    // =========================================================================
    // SCHEMAS
    // =========================================================================

    #[test]
    fn test_latest_binding_follows_new_versions() {
        let (herald, _) = herald_with_split(5_000);
        let app = herald.create_application(OWNER, "chat").unwrap();
        let x = herald
            .create_topic(app, TopicSpec::free("x", AccessLevel::Public), OWNER)
            .unwrap();

        let schema = herald
            .create_schema("chat-message-v1", "chat payload", "B1", AUTHOR)
            .unwrap();
        assert_eq!(herald.publish_schema_version(schema, "B2", AUTHOR).unwrap(), 2);

        herald
            .set_topic_schema(x, schema, VersionSelector::from_raw(0), OWNER)
            .unwrap();
        let resolved = herald.topic_schema(x).unwrap().unwrap();
        assert_eq!((resolved.version, resolved.body.as_str()), (2, "B2"));

        assert_eq!(herald.publish_schema_version(schema, "B3", AUTHOR).unwrap(), 3);
        let resolved = herald.topic_schema(x).unwrap().unwrap();
        assert_eq!((resolved.version, resolved.body.as_str()), (3, "B3"));
        assert_eq!(
            herald.topic_binding(x).unwrap().unwrap().version,
            VersionSelector::Latest
        );
    }

    #[test]
    fn test_pinned_binding_and_foreign_publisher() {
        let (herald, _) = herald_with_split(5_000);
        let app = herald.create_application(OWNER, "chat").unwrap();
        let x = herald
            .create_topic(app, TopicSpec::free("x", AccessLevel::Public), OWNER)
            .unwrap();
        let schema = herald.create_schema("s", "", "B1", AUTHOR).unwrap();

        assert_eq!(
            herald.set_topic_schema(x, schema, VersionSelector::Pinned(2), OWNER),
            Err(HeraldError::VersionNotFound { schema, version: 2 })
        );
        herald
            .set_topic_schema(x, schema, VersionSelector::Pinned(1), OWNER)
            .unwrap();
        herald.publish_schema_version(schema, "B2", AUTHOR).unwrap();
        assert_eq!(herald.topic_schema(x).unwrap().unwrap().body, "B1");

        let err = herald
            .publish_schema_version(schema, "hijack", OWNER)
            .unwrap_err();
        assert_eq!(err, HeraldError::unauthorized(OWNER, Scope::Schema(schema)));
        assert_eq!(herald.schema(schema).unwrap().version_count(), 2);
    }

    // =========================================================================
    // ESCROW
    // =========================================================================

    #[test]
    fn test_release_splits_between_recipient_and_app_owner() {
        let (herald, ledger) = herald_with_split(3_000);
        let k = Token(Address::repeat_byte(0x4B));

        let app = herald.create_application(OWNER, "paid chat").unwrap();
        herald
            .set_role(app, RECIPIENT, Role::Admin, true, OWNER)
            .unwrap();
        let y = herald
            .create_topic(
                app,
                TopicSpec::free("y", AccessLevel::Public).with_fee(fee(k, 50)),
                RECIPIENT,
            )
            .unwrap();

        for sender in [S1, S1, S2] {
            herald
                .send_message(SendMessage::free(y, sender, b"paid".to_vec()).with_fee(Amount::from(50)))
                .unwrap();
        }
        assert_eq!(herald.pending_deposit(y, S1).unwrap(), Amount::from(100));
        assert_eq!(herald.pending_deposit(y, S2).unwrap(), Amount::from(50));

        let settlement = herald.release_escrow(y, RECIPIENT).unwrap().unwrap();
        assert_eq!(settlement.total, Amount::from(150));
        assert_eq!(
            settlement.payouts,
            vec![
                Payout { to: RECIPIENT, amount: Amount::from(45) },
                Payout { to: OWNER, amount: Amount::from(105) },
            ]
        );
        assert_eq!(ledger.balance_of(k, &RECIPIENT), Amount::from(45));
        assert_eq!(ledger.balance_of(k, &OWNER), Amount::from(105));
        assert!(herald.pending_deposit(y, S1).unwrap().is_zero());
        assert!(herald.pending_deposit(y, S2).unwrap().is_zero());

        assert_eq!(herald.release_escrow(y, RECIPIENT).unwrap(), None);
        assert_eq!(ledger.settlement_count(), 1);
    }

    #[test]
    fn test_full_split_pays_recipient_only() {
        let (herald, ledger) = herald_with_split(10_000);
        let app = herald.create_application(OWNER, "a").unwrap();
        herald.set_role(app, RECIPIENT, Role::Admin, true, OWNER).unwrap();
        let y = herald
            .create_topic(
                app,
                TopicSpec::free("y", AccessLevel::Public).with_fee(fee(Token::NATIVE, 7)),
                RECIPIENT,
            )
            .unwrap();
        herald
            .send_message(SendMessage::free(y, S1, Vec::new()).with_fee(Amount::from(7)))
            .unwrap();

        let settlement = herald.release_escrow(y, OWNER).unwrap().unwrap();
        assert_eq!(
            settlement.payouts,
            vec![Payout { to: RECIPIENT, amount: Amount::from(7) }]
        );
        assert!(ledger.balance_of(Token::NATIVE, &OWNER).is_zero());
    }

    // =========================================================================
    // PERMISSIONS
    // =========================================================================

    #[test]
    fn test_private_topic_accepts_after_grant() {
        let (herald, _) = herald_with_split(5_000);
        let app = herald.create_application(OWNER, "team").unwrap();
        let z = herald
            .create_topic(app, TopicSpec::free("z", AccessLevel::Private), OWNER)
            .unwrap();

        let err = herald
            .send_message(SendMessage::free(z, U, b"knock".to_vec()))
            .unwrap_err();
        assert_eq!(err, HeraldError::unauthorized(U, Scope::Topic(z)));
        assert_eq!(herald.message_count(z).unwrap(), 0);

        herald
            .set_topic_permission(z, U, PermissionLevel::Write, OWNER)
            .unwrap();
        let receipt = herald
            .send_message(SendMessage::free(z, U, b"knock".to_vec()))
            .unwrap();

        let message = herald.message(receipt.message_id).unwrap().unwrap();
        assert_eq!((message.sender, message.sequence), (U, 1));
        assert_eq!(message.payload, b"knock");

        // A write grant is at least a read grant.
        assert!(herald.can_read(z, U).unwrap());
        assert_eq!(herald.read_topic_messages(z, U).unwrap().len(), 1);
        assert_eq!(herald.read_topic_messages(z, OWNER).unwrap().len(), 1);
        assert_eq!(
            herald.read_topic_messages(z, S1).unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn test_public_limited_topic_admits_owner_and_members() {
        let (herald, _) = herald_with_split(5_000);
        let app = herald.create_application(OWNER, "club").unwrap();
        let limited = herald
            .create_topic(app, TopicSpec::free("l", AccessLevel::PublicLimited), OWNER)
            .unwrap();

        assert!(herald.roles(app, OWNER).unwrap().contains(Role::Admin));
        assert!(herald.can_write(limited, OWNER).unwrap());
        herald
            .send_message(SendMessage::free(limited, OWNER, b"welcome".to_vec()))
            .unwrap();

        assert_eq!(
            herald
                .send_message(SendMessage::free(limited, U, b"hi".to_vec()))
                .unwrap_err(),
            HeraldError::unauthorized(U, Scope::Topic(limited))
        );
        herald.set_role(app, U, Role::Member, true, OWNER).unwrap();
        herald
            .send_message(SendMessage::free(limited, U, b"hi".to_vec()))
            .unwrap();
        assert_eq!(herald.read_topic_messages(limited, S1).unwrap().len(), 2);
    }

    #[test]
    fn test_app_admin_role_grants_topic_admin() {
        let (herald, _) = herald_with_split(5_000);
        let app = herald.create_application(OWNER, "team").unwrap();
        let z = herald
            .create_topic(app, TopicSpec::free("z", AccessLevel::Private), OWNER)
            .unwrap();

        assert_eq!(herald.topic_permissions(z, U).unwrap(), PermissionLevel::None);
        herald.set_role(app, U, Role::Admin, true, OWNER).unwrap();
        assert_eq!(herald.topic_permissions(z, U).unwrap(), PermissionLevel::Admin);
        assert!(herald.is_topic_admin(z, U).unwrap());

        herald
            .set_topic_access_level(z, AccessLevel::Public, U)
            .unwrap();
        assert!(herald.can_write(z, S1).unwrap());

        herald.set_role(app, U, Role::Admin, false, OWNER).unwrap();
        assert!(!herald.is_topic_admin(z, U).unwrap());
    }

    #[test]
    fn test_journal_serializes_in_commit_order() {
        let (herald, _) = herald_with_split(5_000);
        let app = herald.create_application(OWNER, "a").unwrap();
        let topic = herald
            .create_topic(app, TopicSpec::free("t", AccessLevel::Public), OWNER)
            .unwrap();
        herald
            .send_message(SendMessage::free(topic, U, b"x".to_vec()))
            .unwrap();

        let names: Vec<String> = herald
            .drain_events()
            .unwrap()
            .iter()
            .map(|event| serde_json::to_value(event).unwrap()["event"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["application_created", "topic_created", "message_sent"]);
    }
}
