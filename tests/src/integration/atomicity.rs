//! # Atomicity and Ordering
//!
//! A rejected operation must leave no trace: no state change, no journal
//! entry, no ledger call. Concurrent callers are serialized.

#[cfg(test)]
mod tests {
    use super::super::{fee, herald_with_split, OWNER};
    use herald_runtime::prelude::*;
    use parking_lot::Mutex;
    use shared_types::{ErrorKind, MessageId};
    use std::collections::BTreeSet;
    use std::sync::Weak;
    use std::thread;

    const U: Address = Address::repeat_byte(0x55);

    #[test]
    fn test_rejected_operations_leave_no_events() {
        let (herald, _) = herald_with_split(5_000);
        let app = herald.create_application(OWNER, "a").unwrap();
        let paid = herald
            .create_topic(
                app,
                TopicSpec::free("paid", AccessLevel::Public).with_fee(fee(Token::NATIVE, 10)),
                OWNER,
            )
            .unwrap();
        let schema = herald.create_schema("s", "", "{}", OWNER).unwrap();
        herald.drain_events().unwrap();

        let failures = [
            herald.create_topic(app, TopicSpec::free("t", AccessLevel::Public), U).map(|_| ()),
            herald.set_role(app, U, Role::Admin, true, U).map(|_| ()),
            herald.set_topic_permission(paid, U, PermissionLevel::Admin, U).map(|_| ()),
            herald
                .send_message(SendMessage::free(paid, U, Vec::new()).with_fee(Amount::from(9)))
                .map(|_| ()),
            herald.release_escrow(paid, U).map(|_| ()),
            herald.publish_schema_version(schema, "x", U).map(|_| ()),
            herald.set_topic_schema(paid, schema, VersionSelector::Pinned(5), OWNER).map(|_| ()),
            herald.deactivate_schema(schema, U).map(|_| ()),
        ];
        assert!(failures.iter().all(Result::is_err));

        assert!(herald.drain_events().unwrap().is_empty());
        assert_eq!(herald.topic_count().unwrap(), 1);
        assert!(herald.roles(app, U).unwrap().is_empty());
        assert_eq!(herald.topic_permissions(paid, U).unwrap(), PermissionLevel::None);
        assert_eq!(herald.message_count(paid).unwrap(), 0);
        assert!(herald.total_pending(paid).unwrap().is_zero());
        assert_eq!(herald.schema(schema).unwrap().version_count(), 1);
        assert!(herald.topic_binding(paid).unwrap().is_none());
        assert!(herald.schema(schema).unwrap().active);
    }

    #[test]
    fn test_ledger_failure_keeps_escrow_and_retry_succeeds() {
        let (herald, ledger) = herald_with_split(5_000);
        let app = herald.create_application(OWNER, "a").unwrap();
        let paid = herald
            .create_topic(
                app,
                TopicSpec::free("paid", AccessLevel::Public).with_fee(fee(Token::NATIVE, 10)),
                OWNER,
            )
            .unwrap();
        herald
            .send_message(SendMessage::free(paid, U, Vec::new()).with_fee(Amount::from(10)))
            .unwrap();
        herald.drain_events().unwrap();

        ledger.fail_next("insufficient liquidity");
        let err = herald.release_escrow(paid, OWNER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LedgerFailure);
        assert_eq!(herald.pending_deposit(paid, U).unwrap(), Amount::from(10));
        assert!(herald.drain_events().unwrap().is_empty());

        let settlement = herald.release_escrow(paid, OWNER).unwrap().unwrap();
        assert_eq!(settlement.total, Amount::from(10));
        assert_eq!(herald.drain_events().unwrap().len(), 1);
    }

    /// Ledger that tries to send a message while a release is settling.
    #[derive(Default)]
    struct MeddlingLedger {
        herald: Mutex<Weak<Herald>>,
        topic: Mutex<Option<TopicId>>,
        outcome: Mutex<Option<HeraldResult<Receipt>>>,
    }

    impl Ledger for MeddlingLedger {
        fn settle(&self, _token: Token, _payouts: &[Payout]) -> Result<(), LedgerError> {
            let herald = self.herald.lock().upgrade();
            let topic = *self.topic.lock();
            if let (Some(herald), Some(topic)) = (herald, topic) {
                let sent = herald.send_message(SendMessage::free(topic, U, b"sneak".to_vec()));
                *self.outcome.lock() = Some(sent);
            }
            Ok(())
        }
    }

    #[test]
    fn test_ledger_cannot_reenter_during_release() {
        let ledger = Arc::new(MeddlingLedger::default());
        let herald = Arc::new(
            Herald::new(
                HeraldConfig::new(OWNER, 5_000),
                ledger.clone(),
                Arc::new(ManualClock::new(0)),
            )
            .unwrap(),
        );
        *ledger.herald.lock() = Arc::downgrade(&herald);

        let app = herald.create_application(OWNER, "a").unwrap();
        let free = herald
            .create_topic(app, TopicSpec::free("free", AccessLevel::Public), OWNER)
            .unwrap();
        let paid = herald
            .create_topic(
                app,
                TopicSpec::free("paid", AccessLevel::Public).with_fee(fee(Token::NATIVE, 4)),
                OWNER,
            )
            .unwrap();
        *ledger.topic.lock() = Some(free);
        herald
            .send_message(SendMessage::free(paid, U, Vec::new()).with_fee(Amount::from(4)))
            .unwrap();

        assert!(herald.release_escrow(paid, OWNER).unwrap().is_some());
        assert_eq!(
            ledger.outcome.lock().take(),
            Some(Err(HeraldError::ReentrantCall))
        );
        assert_eq!(herald.message_count(free).unwrap(), 0);
    }

    #[test]
    fn test_concurrent_senders_are_serialized() {
        const THREADS: u8 = 8;
        const PER_THREAD: usize = 50;

        let (herald, _) = herald_with_split(5_000);
        let herald = Arc::new(herald);
        let app = herald.create_application(OWNER, "a").unwrap();
        let topic = herald
            .create_topic(app, TopicSpec::free("busy", AccessLevel::Public), OWNER)
            .unwrap();

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let herald = Arc::clone(&herald);
                thread::spawn(move || {
                    let sender = Address::repeat_byte(0x60 + t);
                    (0..PER_THREAD)
                        .map(|i| {
                            herald
                                .send_message(SendMessage::free(topic, sender, vec![t, i as u8]))
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut sequences = BTreeSet::new();
        let mut ids = BTreeSet::<MessageId>::new();
        for handle in handles {
            let receipts = handle.join().unwrap();
            // Each thread observes its own sends in increasing order.
            assert!(receipts.windows(2).all(|w| w[0].sequence < w[1].sequence));
            for receipt in receipts {
                sequences.insert(receipt.sequence);
                ids.insert(receipt.message_id);
            }
        }

        let total = usize::from(THREADS) * PER_THREAD;
        assert_eq!(sequences.len(), total);
        assert_eq!(ids.len(), total);
        assert_eq!(sequences.iter().next_back().copied(), Some(total as u64));
        assert_eq!(herald.message_count(topic).unwrap(), total as u64);
    }
}
