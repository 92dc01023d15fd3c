//! # Properties
//!
//! Invariants checked over arbitrary operation sequences:
//!
//! - a release pays out exactly what was deposited since the previous one
//!   and zeroes every sender
//! - a release with nothing pending changes nothing
//! - published versions count 1, 2, 3, ... with no gaps
//! - a "latest" binding always resolves to the newest version
//! - `set_role` is idempotent
//! - public topics accept any sender; private topics reject strangers

#[cfg(test)]
mod tests {
    use super::super::{fee, herald_with_split, OWNER};
    use herald_runtime::prelude::*;
    use proptest::prelude::*;
    use shared_types::ErrorKind;
    use std::collections::BTreeMap;

    const FEES: [u64; 3] = [1, 7, 1_000];

    fn sender(index: u8) -> Address {
        Address::repeat_byte(0x40 + index)
    }

    #[derive(Clone, Debug)]
    enum EscrowOp {
        Send { topic: usize, sender: u8 },
        Release { topic: usize },
    }

    fn escrow_op() -> impl Strategy<Value = EscrowOp> {
        prop_oneof![
            4 => (0..FEES.len(), 0u8..5).prop_map(|(topic, sender)| EscrowOp::Send { topic, sender }),
            1 => (0..FEES.len()).prop_map(|topic| EscrowOp::Release { topic }),
        ]
    }

    proptest! {
        #[test]
        fn prop_release_pays_everything_pending(
            bps in 0u16..=10_000,
            ops in prop::collection::vec(escrow_op(), 1..60),
        ) {
            let (herald, ledger) = herald_with_split(bps);
            let app = herald.create_application(OWNER, "app").unwrap();
            let topics: Vec<TopicId> = FEES
                .iter()
                .map(|&amount| {
                    let spec = TopicSpec::free("t", AccessLevel::Public).with_fee(fee(Token::NATIVE, amount));
                    herald.create_topic(app, spec, OWNER).unwrap()
                })
                .collect();

            let mut model: Vec<BTreeMap<Address, u64>> = vec![BTreeMap::new(); FEES.len()];
            let mut paid_out = 0u64;
            for op in ops {
                match op {
                    EscrowOp::Send { topic, sender: index } => {
                        let amount = FEES[topic];
                        herald
                            .send_message(
                                SendMessage::free(topics[topic], sender(index), Vec::new())
                                    .with_fee(Amount::from(amount)),
                            )
                            .unwrap();
                        *model[topic].entry(sender(index)).or_default() += amount;
                    }
                    EscrowOp::Release { topic } => {
                        let expected: u64 = model[topic].values().sum();
                        let before = ledger.settlement_count();
                        let settlement = herald.release_escrow(topics[topic], OWNER).unwrap();
                        if expected == 0 {
                            prop_assert!(settlement.is_none());
                            prop_assert_eq!(ledger.settlement_count(), before);
                        } else {
                            let settlement = settlement.unwrap();
                            prop_assert_eq!(settlement.total, Amount::from(expected));
                            let sum = settlement
                                .payouts
                                .iter()
                                .fold(Amount::zero(), |acc, p| acc + p.amount);
                            prop_assert_eq!(sum, Amount::from(expected));
                            paid_out += expected;
                        }
                        for index in 0..5 {
                            prop_assert!(herald.pending_deposit(topics[topic], sender(index)).unwrap().is_zero());
                        }
                        model[topic].clear();
                    }
                }
            }
            // Recipient and app owner coincide, so every payout lands on OWNER.
            prop_assert_eq!(ledger.balance_of(Token::NATIVE, &OWNER), Amount::from(paid_out));
        }

        #[test]
        fn prop_versions_are_gapless_and_latest_follows(publishes in 0usize..20) {
            let (herald, _) = herald_with_split(5_000);
            let app = herald.create_application(OWNER, "app").unwrap();
            let topic = herald
                .create_topic(app, TopicSpec::free("t", AccessLevel::Public), OWNER)
                .unwrap();
            let author = sender(9);
            let schema = herald.create_schema("s", "", "v1", author).unwrap();
            herald
                .set_topic_schema(topic, schema, VersionSelector::Latest, OWNER)
                .unwrap();

            for expected in 2..(publishes as u32 + 2) {
                let body = format!("v{expected}");
                prop_assert_eq!(herald.publish_schema_version(schema, body.clone(), author).unwrap(), expected);
                let resolved = herald.topic_schema(topic).unwrap().unwrap();
                prop_assert_eq!(resolved.version, expected);
                prop_assert_eq!(resolved.body, body);
            }
            prop_assert_eq!(herald.schema(schema).unwrap().version_count(), publishes as u32 + 1);
        }

        #[test]
        fn prop_set_role_is_idempotent(
            calls in prop::collection::vec((0u8..4, prop::bool::ANY, prop::bool::ANY), 1..20),
        ) {
            let (herald, _) = herald_with_split(5_000);
            let app = herald.create_application(OWNER, "app").unwrap();
            for (member, admin, enabled) in calls {
                let role = if admin { Role::Admin } else { Role::Member };
                herald.set_role(app, sender(member), role, enabled, OWNER).unwrap();
                let once = herald.roles(app, sender(member)).unwrap();
                let change = herald.set_role(app, sender(member), role, enabled, OWNER).unwrap();
                prop_assert_eq!(change, RoleChange::Unchanged);
                prop_assert_eq!(herald.roles(app, sender(member)).unwrap(), once);
            }
        }

        #[test]
        fn prop_public_accepts_private_rejects_strangers(index in 0u8..100, payload in prop::collection::vec(any::<u8>(), 0..64)) {
            let (herald, _) = herald_with_split(5_000);
            let app = herald.create_application(OWNER, "app").unwrap();
            let public = herald
                .create_topic(app, TopicSpec::free("pub", AccessLevel::Public).with_fee(fee(Token::NATIVE, 3)), OWNER)
                .unwrap();
            let private = herald
                .create_topic(app, TopicSpec::free("priv", AccessLevel::Private), OWNER)
                .unwrap();
            let stranger = Address::repeat_byte(0x80 + index);

            let receipt = herald
                .send_message(SendMessage::free(public, stranger, payload.clone()).with_fee(Amount::from(3)))
                .unwrap();
            prop_assert_eq!(receipt.escrowed, Some(Amount::from(3)));

            let err = herald
                .send_message(SendMessage::free(private, stranger, payload))
                .unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::Unauthorized);
            prop_assert_eq!(herald.message_count(private).unwrap(), 0);
        }
    }
}
