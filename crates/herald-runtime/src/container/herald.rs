//! # Herald
//!
//! The public entry point. Each method is one logical operation: it takes
//! exclusive access to the world state, runs to completion or fails with no
//! effect, appends its events and releases access.

use super::exclusive::Exclusive;
use super::world::WorldState;
use crate::config::{ConfigError, HeraldConfig};
use crate::events::HeraldEvent;
use crate::ports::Clock;
use herald_telemetry::{
    metric_inc, ESCROW_DEPOSITS, ESCROW_RELEASES, ESCROW_VALUE_RELEASED, MESSAGES_SENT,
    OPERATIONS_REJECTED, SCHEMA_VERSIONS_PUBLISHED,
};
use hr_01_topic_registry::domain::{
    AccessLevel, Application, PermissionLevel, Role, RoleChange, RoleSet, Topic, TopicSpec,
};
use hr_01_topic_registry::ports::TopicDirectory;
use hr_02_schema_registry::domain::{Binding, ResolvedSchema, Schema, SchemaVersion, VersionSelector};
use hr_03_message_escrow::adapters::InMemoryLedger;
use hr_03_message_escrow::domain::{EscrowCapability, EscrowPosition, Settlement};
use hr_03_message_escrow::ports::Ledger;
use hr_04_message_dispatch::adapters::CapabilityEscrow;
use hr_04_message_dispatch::domain::{Message, Receipt, SendMessage};
use shared_types::{Address, Amount, AppId, HeraldResult, MessageId, SchemaId, Timestamp, TopicId};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The Herald state machine.
pub struct Herald {
    config: HeraldConfig,
    state: Exclusive<WorldState>,
    escrow_capability: EscrowCapability,
    ledger: Arc<dyn Ledger>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Herald {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Herald")
            .field("config", &self.config)
            .field("escrow", &self.escrow_capability.escrow_id())
            .finish_non_exhaustive()
    }
}

impl Herald {
    /// Builds an empty Herald.
    ///
    /// # Errors
    /// Any `validate()` failure of `config`.
    pub fn new(
        config: HeraldConfig,
        ledger: Arc<dyn Ledger>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (world, escrow_capability) = WorldState::new(&config)
            .map_err(|_| ConfigError::InvalidSplit(config.escrow.recipient_share_bps))?;
        info!(
            registry_owner = %config.registry_owner,
            operator = %config.escrow.operator,
            recipient_share_bps = config.escrow.recipient_share_bps,
            allow_rebind = config.schema.allow_rebind,
            "herald initialized"
        );
        Ok(Self {
            config,
            state: Exclusive::new(world),
            escrow_capability,
            ledger,
            clock,
        })
    }

    /// Builds an empty Herald settling through a fresh [`InMemoryLedger`],
    /// which is returned alongside for inspection.
    ///
    /// # Errors
    /// Any `validate()` failure of `config`.
    pub fn in_memory(
        config: HeraldConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<(Self, Arc<InMemoryLedger>), ConfigError> {
        let ledger = Arc::new(InMemoryLedger::new());
        let herald = Self::new(config, ledger.clone(), clock)?;
        Ok((herald, ledger))
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &HeraldConfig {
        &self.config
    }

    // =========================================================================
    // REGISTRY
    // =========================================================================

    /// Creates an application owned by `owner`.
    #[instrument(skip_all, fields(owner = %owner))]
    pub fn create_application(&self, owner: Address, name: impl Into<String>) -> HeraldResult<AppId> {
        let name = name.into();
        self.mutate("create_application", |world, now| {
            let app_id = world.registry.create_application(owner, name, now)?;
            world
                .journal
                .push(HeraldEvent::ApplicationCreated { app_id, owner });
            Ok(app_id)
        })
    }

    /// Creates a topic owned by `caller`. Escrow topics are registered with
    /// the escrow in the same operation.
    #[instrument(skip_all, fields(app_id = %app_id, caller = %caller))]
    pub fn create_topic(&self, app_id: AppId, spec: TopicSpec, caller: Address) -> HeraldResult<TopicId> {
        self.mutate("create_topic", |world, now| {
            // Checked first so that enabling the escrow below cannot fail.
            world.escrow.authorize(&self.escrow_capability)?;
            let topic_id = world.registry.create_topic(app_id, spec, caller, now)?;
            let topic = world.registry.topic(topic_id)?;
            let (access_level, escrow) = (topic.access_level, topic.escrow_enabled());
            if escrow {
                world
                    .escrow
                    .enable_topic(&self.escrow_capability, topic_id)?;
            }
            world.journal.push(HeraldEvent::TopicCreated {
                topic_id,
                app_id,
                owner: caller,
                access_level,
                escrow,
            });
            Ok(topic_id)
        })
    }

    /// Enables or disables one role for `member`. Idempotent.
    #[instrument(skip_all, fields(app_id = %app_id, member = %member, role = ?role, enabled = enabled))]
    pub fn set_role(
        &self,
        app_id: AppId,
        member: Address,
        role: Role,
        enabled: bool,
        caller: Address,
    ) -> HeraldResult<RoleChange> {
        self.mutate("set_role", |world, _| {
            let change = world
                .registry
                .set_role(app_id, member, role, enabled, caller)?;
            if change == RoleChange::Applied {
                world.journal.push(HeraldEvent::RoleUpdated {
                    app_id,
                    member,
                    role,
                    enabled,
                });
            }
            Ok(change)
        })
    }

    /// Sets `user`'s explicit level on a topic. Returns the previous level.
    #[instrument(skip_all, fields(topic_id = %topic_id, user = %user, level = %level))]
    pub fn set_topic_permission(
        &self,
        topic_id: TopicId,
        user: Address,
        level: PermissionLevel,
        caller: Address,
    ) -> HeraldResult<PermissionLevel> {
        self.mutate("set_topic_permission", |world, _| {
            let previous = world
                .registry
                .set_topic_permission(topic_id, user, level, caller)?;
            world.journal.push(HeraldEvent::TopicPermissionUpdated {
                topic_id,
                user,
                level,
            });
            Ok(previous)
        })
    }

    /// Changes a topic's access level. Returns the previous level.
    #[instrument(skip_all, fields(topic_id = %topic_id, access_level = ?access_level))]
    pub fn set_topic_access_level(
        &self,
        topic_id: TopicId,
        access_level: AccessLevel,
        caller: Address,
    ) -> HeraldResult<AccessLevel> {
        self.mutate("set_topic_access_level", |world, _| {
            let previous = world
                .registry
                .set_topic_access_level(topic_id, access_level, caller)?;
            world.journal.push(HeraldEvent::TopicAccessLevelUpdated {
                topic_id,
                access_level,
            });
            Ok(previous)
        })
    }

    // =========================================================================
    // DISPATCH & ESCROW
    // =========================================================================

    /// Sends one message, depositing its fee for escrow topics.
    #[instrument(skip_all, fields(topic_id = %request.topic, sender = %request.sender))]
    pub fn send_message(&self, request: SendMessage) -> HeraldResult<Receipt> {
        let (topic_id, sender) = (request.topic, request.sender);
        self.mutate("send_message", |world, now| {
            let mut escrow = CapabilityEscrow::new(&mut world.escrow, &self.escrow_capability);
            let receipt = world
                .dispatch
                .send_message(&world.registry, &mut escrow, request, now)?;

            if let Some(amount) = receipt.escrowed {
                if let Some(position) = world.escrow.position(topic_id) {
                    world.journal.push(HeraldEvent::DepositRecorded {
                        topic_id,
                        sender,
                        token: position.token,
                        amount,
                    });
                }
                ESCROW_DEPOSITS.inc();
            }
            world.journal.push(HeraldEvent::MessageSent {
                message_id: receipt.message_id,
                topic_id,
                sender,
                sequence: receipt.sequence,
            });
            metric_inc!(MESSAGES_SENT);
            Ok(receipt)
        })
    }

    /// Messages of a topic, if `reader` may read it.
    pub fn read_topic_messages(&self, topic_id: TopicId, reader: Address) -> HeraldResult<Vec<Message>> {
        let result = self.query(|world| {
            world
                .dispatch
                .read_topic_messages(&world.registry, topic_id, &reader)
                .map(|messages| messages.into_iter().cloned().collect())
        });
        self.observe("read_topic_messages", result.and_then(|inner| inner))
    }

    /// Releases a topic's escrow through the ledger. Topic admins only.
    /// `Ok(None)` when nothing was pending.
    #[instrument(skip_all, fields(topic_id = %topic_id, caller = %caller))]
    pub fn release_escrow(&self, topic_id: TopicId, caller: Address) -> HeraldResult<Option<Settlement>> {
        self.mutate("release_escrow", |world, _| {
            world.registry.require_topic_admin(topic_id, &caller)?;
            let settlement = world.escrow.release_for_topic(
                &self.escrow_capability,
                topic_id,
                self.ledger.as_ref(),
            )?;
            if let Some(settlement) = &settlement {
                world.journal.push(HeraldEvent::EscrowReleased {
                    topic_id,
                    total: settlement.total,
                    payouts: settlement.payouts.clone(),
                });
                ESCROW_RELEASES.inc();
                ESCROW_VALUE_RELEASED.inc_by(amount_as_f64(settlement.total));
            }
            Ok(settlement)
        })
    }

    // =========================================================================
    // SCHEMAS
    // =========================================================================

    /// Creates a schema with `body` as version 1. Permissionless.
    #[instrument(skip_all, fields(caller = %caller))]
    pub fn create_schema(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        body: impl Into<String>,
        caller: Address,
    ) -> HeraldResult<SchemaId> {
        let (name, description, body) = (name.into(), description.into(), body.into());
        self.mutate("create_schema", |world, now| {
            let schema_id = world
                .schemas
                .create_schema(name, description, body, caller, now)?;
            world.journal.push(HeraldEvent::SchemaCreated {
                schema_id,
                creator: caller,
            });
            Ok(schema_id)
        })
    }

    /// Publishes the next version of a schema. Creator only.
    #[instrument(skip_all, fields(schema_id = %schema_id, caller = %caller))]
    pub fn publish_schema_version(
        &self,
        schema_id: SchemaId,
        body: impl Into<String>,
        caller: Address,
    ) -> HeraldResult<u32> {
        let body = body.into();
        self.mutate("publish_schema_version", |world, now| {
            let version = world
                .schemas
                .publish_schema_version(schema_id, body, caller, now)?;
            world.journal.push(HeraldEvent::SchemaVersionPublished { schema_id, version });
            SCHEMA_VERSIONS_PUBLISHED.inc();
            Ok(version)
        })
    }

    /// Binds a topic to a schema. Topic admins only. Returns the replaced
    /// binding, if any.
    #[instrument(skip_all, fields(topic_id = %topic_id, schema_id = %schema_id, version = ?version))]
    pub fn set_topic_schema(
        &self,
        topic_id: TopicId,
        schema_id: SchemaId,
        version: VersionSelector,
        caller: Address,
    ) -> HeraldResult<Option<Binding>> {
        self.mutate("set_topic_schema", |world, _| {
            let previous =
                world
                    .schemas
                    .set_topic_schema(&world.registry, topic_id, schema_id, version, caller)?;
            world.journal.push(HeraldEvent::TopicSchemaSet {
                topic_id,
                schema_id,
                version,
            });
            Ok(previous)
        })
    }

    /// Deletes a topic's binding. Topic admins only. Returns false if the
    /// topic was not bound.
    #[instrument(skip_all, fields(topic_id = %topic_id, caller = %caller))]
    pub fn clear_topic_schema(&self, topic_id: TopicId, caller: Address) -> HeraldResult<bool> {
        self.mutate("clear_topic_schema", |world, _| {
            let removed = world
                .schemas
                .clear_topic_schema(&world.registry, topic_id, caller)?;
            if removed.is_some() {
                world
                    .journal
                    .push(HeraldEvent::TopicSchemaCleared { topic_id });
            }
            Ok(removed.is_some())
        })
    }

    /// Deactivates a schema. Creator or registry owner only. Returns false if
    /// it was already inactive.
    #[instrument(skip_all, fields(schema_id = %schema_id, caller = %caller))]
    pub fn deactivate_schema(&self, schema_id: SchemaId, caller: Address) -> HeraldResult<bool> {
        self.mutate("deactivate_schema", |world, _| {
            let changed = world.schemas.deactivate_schema(schema_id, caller)?;
            if changed {
                world.journal.push(HeraldEvent::SchemaDeactivated {
                    schema_id,
                    by: caller,
                });
            }
            Ok(changed)
        })
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Looks up an application.
    pub fn application(&self, app_id: AppId) -> HeraldResult<Application> {
        self.query(|w| w.registry.application(app_id).cloned())?
    }

    /// Looks up a topic.
    pub fn topic(&self, topic_id: TopicId) -> HeraldResult<Topic> {
        self.query(|w| w.registry.topic(topic_id).cloned())?
    }

    /// Roles of `member` in an application.
    pub fn roles(&self, app_id: AppId, member: Address) -> HeraldResult<RoleSet> {
        self.query(|w| w.registry.roles(app_id, &member))?
    }

    /// Effective level of `user` on a topic (`Admin` for any topic admin).
    pub fn topic_permissions(&self, topic_id: TopicId, user: Address) -> HeraldResult<PermissionLevel> {
        self.query(|w| w.registry.topic_permissions(topic_id, &user))
    }

    /// Number of topics ever created.
    pub fn topic_count(&self) -> HeraldResult<u64> {
        self.query(|w| w.registry.topic_count())
    }

    /// Number of applications ever created.
    pub fn application_count(&self) -> HeraldResult<u64> {
        self.query(|w| w.registry.application_count())
    }

    /// Owner of the topic's application.
    pub fn app_owner_of(&self, topic_id: TopicId) -> HeraldResult<Address> {
        self.query(|w| w.registry.app_owner_of(topic_id))?
    }

    /// Read check.
    pub fn can_read(&self, topic_id: TopicId, actor: Address) -> HeraldResult<bool> {
        self.query(|w| w.registry.can_read(topic_id, &actor))?
    }

    /// Write check.
    pub fn can_write(&self, topic_id: TopicId, actor: Address) -> HeraldResult<bool> {
        self.query(|w| w.registry.can_write(topic_id, &actor))?
    }

    /// Topic-admin check.
    pub fn is_topic_admin(&self, topic_id: TopicId, actor: Address) -> HeraldResult<bool> {
        self.query(|w| w.registry.is_topic_admin(topic_id, &actor))?
    }

    /// True if the escrow accepts deposits for the topic.
    pub fn is_escrow_enabled(&self, topic_id: TopicId) -> HeraldResult<bool> {
        self.query(|w| w.escrow.is_escrow_enabled(topic_id))
    }

    /// Pending escrow of `sender` on a topic.
    pub fn pending_deposit(&self, topic_id: TopicId, sender: Address) -> HeraldResult<Amount> {
        self.query(|w| w.escrow.pending(topic_id, &sender))
    }

    /// Pending escrow total of a topic.
    pub fn total_pending(&self, topic_id: TopicId) -> HeraldResult<Amount> {
        self.query(|w| w.escrow.total_pending(topic_id))
    }

    /// Escrow position of a topic, once opened by a first deposit.
    pub fn escrow_position(&self, topic_id: TopicId) -> HeraldResult<Option<EscrowPosition>> {
        self.query(|w| w.escrow.position(topic_id).cloned())
    }

    /// Looks up a message. No read check.
    pub fn message(&self, message_id: MessageId) -> HeraldResult<Option<Message>> {
        self.query(|w| w.dispatch.message(message_id).cloned())
    }

    /// Messages of a topic in sequence order. No read check.
    pub fn topic_messages(&self, topic_id: TopicId) -> HeraldResult<Vec<Message>> {
        self.query(|w| {
            w.dispatch
                .log()
                .topic_messages(topic_id)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Number of messages on a topic.
    pub fn message_count(&self, topic_id: TopicId) -> HeraldResult<u64> {
        self.query(|w| w.dispatch.log().message_count(topic_id))
    }

    /// Resolved schema of a topic; `None` if unbound.
    pub fn topic_schema(&self, topic_id: TopicId) -> HeraldResult<Option<ResolvedSchema>> {
        self.query(|w| w.schemas.topic_schema(topic_id))
    }

    /// Raw binding of a topic.
    pub fn topic_binding(&self, topic_id: TopicId) -> HeraldResult<Option<Binding>> {
        self.query(|w| w.schemas.binding(topic_id))
    }

    /// Looks up a schema.
    pub fn schema(&self, schema_id: SchemaId) -> HeraldResult<Schema> {
        self.query(|w| w.schemas.schema(schema_id).cloned())?
    }

    /// Looks up one schema version.
    pub fn schema_version(&self, schema_id: SchemaId, version: u32) -> HeraldResult<SchemaVersion> {
        self.query(|w| w.schemas.schema_version(schema_id, version).cloned())?
    }

    /// Schemas created by `creator`.
    pub fn schemas_by_creator(&self, creator: Address) -> HeraldResult<Vec<SchemaId>> {
        self.query(|w| w.schemas.schemas_by_creator(&creator).to_vec())
    }

    /// Returns and clears the event journal. The journal holds at most
    /// `limits.max_journal_events`; older entries are dropped first.
    pub fn drain_events(&self) -> HeraldResult<Vec<HeraldEvent>> {
        let mut world = self.state.enter()?;
        Ok(world.journal.drain())
    }

    // =========================================================================
    // PLUMBING
    // =========================================================================

    fn mutate<T>(
        &self,
        operation: &'static str,
        op: impl FnOnce(&mut WorldState, Timestamp) -> HeraldResult<T>,
    ) -> HeraldResult<T> {
        let result = self.state.enter().and_then(|mut session| {
            let now = self.clock.now();
            op(&mut *session, now)
        });
        self.observe(operation, result)
    }

    fn query<T>(&self, read: impl FnOnce(&WorldState) -> T) -> HeraldResult<T> {
        let session = self.state.enter()?;
        Ok(read(&*session))
    }

    fn observe<T>(&self, operation: &'static str, result: HeraldResult<T>) -> HeraldResult<T> {
        if let Err(e) = &result {
            metric_inc!(OPERATIONS_REJECTED, &[operation, e.kind().as_str()]);
            debug!(operation, error = %e, "operation rejected");
        }
        result
    }
}

/// Counter value for an amount. Amounts beyond `u128` saturate so the
/// counter stays finite.
fn amount_as_f64(amount: Amount) -> f64 {
    if amount.bits() <= 128 {
        amount.low_u128() as f64
    } else {
        u128::MAX as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ManualClock;
    use hr_01_topic_registry::domain::FeePolicy;
    use hr_03_message_escrow::ports::{LedgerError, Payout};
    use parking_lot::Mutex;
    use shared_types::{ErrorKind, HeraldError, Scope, Token};
    use std::sync::Weak;

    const OWNER: Address = Address::repeat_byte(0x01);
    const USER: Address = Address::repeat_byte(0x02);
    const OTHER: Address = Address::repeat_byte(0x03);

    fn herald() -> (Herald, Arc<InMemoryLedger>) {
        Herald::in_memory(HeraldConfig::new(OWNER, 5_000), Arc::new(ManualClock::new(1_000)))
            .unwrap()
    }

    fn paid(amount: u64) -> TopicSpec {
        TopicSpec::free("paid", AccessLevel::Public).with_fee(FeePolicy::Escrow {
            token: Token::NATIVE,
            amount: Amount::from(amount),
        })
    }

    #[test]
    fn test_amount_as_f64_saturates_at_u128() {
        assert_eq!(amount_as_f64(Amount::from(42)), 42.0);
        assert_eq!(amount_as_f64(Amount::from(u128::MAX)), u128::MAX as f64);
        let huge = amount_as_f64(Amount::MAX);
        assert_eq!(huge, u128::MAX as f64);
        assert!((huge + huge).is_finite());
    }

    #[test]
    fn test_rejects_invalid_split() {
        let result = Herald::in_memory(
            HeraldConfig::new(OWNER, 10_001),
            Arc::new(ManualClock::new(0)),
        );
        assert!(matches!(result, Err(ConfigError::InvalidSplit(10_001))));
    }

    #[test]
    fn test_escrow_topic_is_enabled_on_creation() {
        let (herald, _) = herald();
        let app = herald.create_application(OWNER, "app").unwrap();
        let free = herald
            .create_topic(app, TopicSpec::free("free", AccessLevel::Public), OWNER)
            .unwrap();
        let paid = herald.create_topic(app, paid(10), OWNER).unwrap();

        assert!(!herald.is_escrow_enabled(free).unwrap());
        assert!(herald.is_escrow_enabled(paid).unwrap());
        assert_eq!(herald.topic(paid).unwrap().created_at, 1_000);
    }

    #[test]
    fn test_send_and_release_settle_through_ledger() {
        let (herald, ledger) = herald();
        let app = herald.create_application(OWNER, "app").unwrap();
        let topic = herald.create_topic(app, paid(10), OWNER).unwrap();

        for _ in 0..3 {
            herald
                .send_message(SendMessage::free(topic, USER, b"hi".to_vec()).with_fee(Amount::from(10)))
                .unwrap();
        }
        assert_eq!(herald.pending_deposit(topic, USER).unwrap(), Amount::from(30));

        let err = herald.release_escrow(topic, USER).unwrap_err();
        assert_eq!(err, HeraldError::unauthorized(USER, Scope::Topic(topic)));

        let settlement = herald.release_escrow(topic, OWNER).unwrap().unwrap();
        assert_eq!(settlement.total, Amount::from(30));
        // Recipient and app owner coincide, so both halves land on OWNER.
        assert_eq!(ledger.balance_of(Token::NATIVE, &OWNER), Amount::from(30));
        assert!(herald.total_pending(topic).unwrap().is_zero());
        assert_eq!(herald.release_escrow(topic, OWNER).unwrap(), None);
    }

    #[test]
    fn test_failed_settlement_keeps_balances() {
        let (herald, ledger) = herald();
        let app = herald.create_application(OWNER, "app").unwrap();
        let topic = herald.create_topic(app, paid(4), OWNER).unwrap();
        herald
            .send_message(SendMessage::free(topic, USER, Vec::new()).with_fee(Amount::from(4)))
            .unwrap();
        herald.drain_events().unwrap();

        ledger.fail_next("offline");
        let err = herald.release_escrow(topic, OWNER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LedgerFailure);
        assert_eq!(herald.total_pending(topic).unwrap(), Amount::from(4));
        assert!(herald.drain_events().unwrap().is_empty());
    }

    #[test]
    fn test_events_follow_successful_operations() {
        let (herald, _) = herald();
        let app = herald.create_application(OWNER, "app").unwrap();
        let topic = herald
            .create_topic(app, TopicSpec::free("t", AccessLevel::Private), OWNER)
            .unwrap();
        assert!(herald
            .set_topic_permission(topic, USER, PermissionLevel::Write, OTHER)
            .is_err());
        herald
            .set_role(app, USER, Role::Admin, true, OWNER)
            .unwrap();
        // Second identical call is a no-op and emits nothing.
        assert_eq!(
            herald.set_role(app, USER, Role::Admin, true, OWNER).unwrap(),
            RoleChange::Unchanged
        );

        let events = herald.drain_events().unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], HeraldEvent::ApplicationCreated { .. }));
        assert!(matches!(events[1], HeraldEvent::TopicCreated { escrow: false, .. }));
        assert!(matches!(events[2], HeraldEvent::RoleUpdated { enabled: true, .. }));
        assert!(herald.drain_events().unwrap().is_empty());
    }

    #[test]
    fn test_journal_is_bounded() {
        let mut config = HeraldConfig::new(OWNER, 5_000);
        config.limits.max_journal_events = 2;
        let (herald, _) = Herald::in_memory(config, Arc::new(ManualClock::new(0))).unwrap();
        for _ in 0..5 {
            herald.create_application(OWNER, "app").unwrap();
        }
        let events = herald.drain_events().unwrap();
        assert_eq!(
            events,
            vec![
                HeraldEvent::ApplicationCreated { app_id: AppId(4), owner: OWNER },
                HeraldEvent::ApplicationCreated { app_id: AppId(5), owner: OWNER },
            ]
        );
    }

    #[test]
    fn test_schema_operations() {
        let (herald, _) = herald();
        let app = herald.create_application(OWNER, "app").unwrap();
        let topic = herald
            .create_topic(app, TopicSpec::free("t", AccessLevel::Public), OWNER)
            .unwrap();
        let schema = herald.create_schema("chat", "", "{}", USER).unwrap();
        assert_eq!(herald.publish_schema_version(schema, "{\"v\":2}", USER).unwrap(), 2);

        herald
            .set_topic_schema(topic, schema, VersionSelector::Pinned(1), OWNER)
            .unwrap();
        assert_eq!(herald.topic_schema(topic).unwrap().unwrap().body, "{}");

        assert!(herald.deactivate_schema(schema, OWNER).unwrap());
        // Existing bindings still resolve.
        assert!(herald.topic_schema(topic).unwrap().is_some());
        assert!(herald.clear_topic_schema(topic, OWNER).unwrap());
        assert!(!herald.clear_topic_schema(topic, OWNER).unwrap());
        assert_eq!(herald.schemas_by_creator(USER).unwrap(), vec![schema]);
    }

    /// Ledger that calls back into Herald while settling.
    #[derive(Default)]
    struct CallbackLedger {
        herald: Mutex<Weak<Herald>>,
        observed: Mutex<Option<HeraldResult<u64>>>,
    }

    impl Ledger for CallbackLedger {
        fn settle(&self, _token: Token, _payouts: &[Payout]) -> Result<(), LedgerError> {
            let herald = self.herald.lock().upgrade();
            if let Some(herald) = herald {
                *self.observed.lock() = Some(herald.topic_count());
            }
            Ok(())
        }
    }

    #[test]
    fn test_reentrant_ledger_call_is_rejected() {
        let ledger = Arc::new(CallbackLedger::default());
        let herald = Arc::new(
            Herald::new(
                HeraldConfig::new(OWNER, 5_000),
                ledger.clone(),
                Arc::new(ManualClock::new(0)),
            )
            .unwrap(),
        );
        *ledger.herald.lock() = Arc::downgrade(&herald);

        let app = herald.create_application(OWNER, "app").unwrap();
        let topic = herald.create_topic(app, paid(2), OWNER).unwrap();
        herald
            .send_message(SendMessage::free(topic, USER, Vec::new()).with_fee(Amount::from(2)))
            .unwrap();
        herald.release_escrow(topic, OWNER).unwrap();

        assert_eq!(
            ledger.observed.lock().take(),
            Some(Err(HeraldError::ReentrantCall))
        );
        // The guard is released once the outer operation returns.
        assert_eq!(herald.topic_count().unwrap(), 1);
    }
}
