//! # Topic & Membership Registry
//!
//! Owns applications, topics, member roles and topic permissions.
//!
//! ## Invariants Enforced
//!
//! - Ids are assigned monotonically from 1 and never reused.
//! - `Topic::app_id` never changes after creation.
//! - Every mutation validates before it writes: a failed check leaves the
//!   registry exactly as it was.

use super::entities::{Application, RoleChange, Topic, TopicSpec};
use super::permissions;
use super::value_objects::{AccessLevel, PermissionLevel, Role, RoleSet};
use crate::config::RegistryConfig;
use shared_types::{
    Address, AppId, HeraldError, HeraldResult, IdSequence, Scope, Timestamp, TopicId,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Registry state.
#[derive(Clone, Debug, Default)]
pub struct TopicRegistry {
    config: RegistryConfig,
    applications: BTreeMap<AppId, Application>,
    topics: BTreeMap<TopicId, Topic>,
    app_ids: IdSequence<AppId>,
    topic_ids: IdSequence<TopicId>,
}

impl TopicRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Creates an application owned by `owner`.
    pub fn create_application(
        &mut self,
        owner: Address,
        name: String,
        now: Timestamp,
    ) -> HeraldResult<AppId> {
        self.check_name(&name)?;

        let id = self.app_ids.allocate();
        self.applications
            .insert(id, Application::new(id, owner, name, now));
        info!(app_id = %id, owner = %owner, "application created");
        Ok(id)
    }

    /// Creates a topic in `app_id`, owned by `caller`.
    ///
    /// # Errors
    /// - `ApplicationNotFound` if the application does not exist
    /// - `Unauthorized` unless `caller` is an application admin
    /// - `ZeroAmount` if escrow is enabled with a zero fee
    /// - `LimitExceeded` if the name is too long
    pub fn create_topic(
        &mut self,
        app_id: AppId,
        spec: TopicSpec,
        caller: Address,
        now: Timestamp,
    ) -> HeraldResult<TopicId> {
        let app = self.application(app_id)?;
        if !app.is_admin(&caller) {
            warn!(app_id = %app_id, caller = %caller, "create_topic rejected: not app admin");
            return Err(HeraldError::unauthorized(caller, Scope::Application(app_id)));
        }
        self.check_name(&spec.name)?;
        if spec.fee.escrow_enabled() && spec.fee.required_fee().is_zero() {
            return Err(HeraldError::ZeroAmount);
        }

        let id = self.topic_ids.allocate();
        let topic = Topic::new(id, app_id, caller, spec, now);
        info!(
            topic_id = %id,
            app_id = %app_id,
            access = ?topic.access_level,
            escrow = topic.escrow_enabled(),
            "topic created"
        );
        self.topics.insert(id, topic);
        Ok(id)
    }

    /// Enables or disables one role for `member`. Idempotent: repeating a call
    /// reports `RoleChange::Unchanged` and is not an error.
    ///
    /// # Errors
    /// - `ApplicationNotFound`
    /// - `Unauthorized` unless `caller` is an application admin
    pub fn set_role(
        &mut self,
        app_id: AppId,
        member: Address,
        role: Role,
        enabled: bool,
        caller: Address,
    ) -> HeraldResult<RoleChange> {
        let app = self
            .applications
            .get_mut(&app_id)
            .ok_or(HeraldError::ApplicationNotFound(app_id))?;
        if !app.is_admin(&caller) {
            warn!(app_id = %app_id, caller = %caller, "set_role rejected: not app admin");
            return Err(HeraldError::unauthorized(caller, Scope::Application(app_id)));
        }

        if app.apply_role(member, role, enabled) {
            info!(app_id = %app_id, member = %member, ?role, enabled, "role updated");
            Ok(RoleChange::Applied)
        } else {
            debug!(app_id = %app_id, member = %member, ?role, enabled, "role already in requested state");
            Ok(RoleChange::Unchanged)
        }
    }

    /// Sets the explicit permission of `user` on a topic. `None` removes the
    /// grant. Returns the previous explicit level.
    ///
    /// # Errors
    /// - `TopicNotFound`
    /// - `Unauthorized` unless `caller` is a topic admin
    pub fn set_topic_permission(
        &mut self,
        topic_id: TopicId,
        user: Address,
        level: PermissionLevel,
        caller: Address,
    ) -> HeraldResult<PermissionLevel> {
        self.require_topic_admin(topic_id, &caller)?;
        let topic = self
            .topics
            .get_mut(&topic_id)
            .ok_or(HeraldError::TopicNotFound(topic_id))?;

        let previous = topic.permission_of(&user);
        topic.apply_permission(user, level);
        info!(topic_id = %topic_id, user = %user, %previous, %level, "topic permission updated");
        Ok(previous)
    }

    /// Changes a topic's access level. Returns the previous level.
    ///
    /// # Errors
    /// - `TopicNotFound`
    /// - `Unauthorized` unless `caller` is a topic admin
    pub fn set_topic_access_level(
        &mut self,
        topic_id: TopicId,
        access_level: AccessLevel,
        caller: Address,
    ) -> HeraldResult<AccessLevel> {
        self.require_topic_admin(topic_id, &caller)?;
        let topic = self
            .topics
            .get_mut(&topic_id)
            .ok_or(HeraldError::TopicNotFound(topic_id))?;

        let previous = std::mem::replace(&mut topic.access_level, access_level);
        info!(topic_id = %topic_id, ?previous, ?access_level, "topic access level updated");
        Ok(previous)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Looks up an application.
    pub fn application(&self, app_id: AppId) -> HeraldResult<&Application> {
        self.applications
            .get(&app_id)
            .ok_or(HeraldError::ApplicationNotFound(app_id))
    }

    /// Looks up a topic.
    pub fn topic(&self, topic_id: TopicId) -> HeraldResult<&Topic> {
        self.topics
            .get(&topic_id)
            .ok_or(HeraldError::TopicNotFound(topic_id))
    }

    /// Looks up a topic together with its application.
    pub fn topic_with_app(&self, topic_id: TopicId) -> HeraldResult<(&Application, &Topic)> {
        let topic = self.topic(topic_id)?;
        let app = self.application(topic.app_id)?;
        Ok((app, topic))
    }

    /// Roles of `member` in `app_id`.
    pub fn roles(&self, app_id: AppId, member: &Address) -> HeraldResult<RoleSet> {
        Ok(self.application(app_id)?.roles_of(member))
    }

    /// Owner of the application a topic belongs to.
    pub fn app_owner_of(&self, topic_id: TopicId) -> HeraldResult<Address> {
        Ok(self.topic_with_app(topic_id)?.0.owner)
    }

    /// Number of applications ever created.
    #[must_use]
    pub fn application_count(&self) -> u64 {
        self.app_ids.issued()
    }

    /// Number of topics ever created. Topic ids are `1..=topic_count()`.
    #[must_use]
    pub fn topic_count(&self) -> u64 {
        self.topic_ids.issued()
    }

    /// See [`permissions::can_read`].
    pub fn can_read(&self, topic_id: TopicId, actor: &Address) -> HeraldResult<bool> {
        let (app, topic) = self.topic_with_app(topic_id)?;
        Ok(permissions::can_read(app, topic, actor))
    }

    /// See [`permissions::can_write`].
    pub fn can_write(&self, topic_id: TopicId, actor: &Address) -> HeraldResult<bool> {
        let (app, topic) = self.topic_with_app(topic_id)?;
        Ok(permissions::can_write(app, topic, actor))
    }

    /// See [`permissions::is_topic_admin`].
    pub fn is_topic_admin(&self, topic_id: TopicId, actor: &Address) -> HeraldResult<bool> {
        let (app, topic) = self.topic_with_app(topic_id)?;
        Ok(permissions::is_topic_admin(app, topic, actor))
    }

    /// See [`permissions::effective_permission`].
    pub fn effective_permission(
        &self,
        topic_id: TopicId,
        actor: &Address,
    ) -> HeraldResult<PermissionLevel> {
        let (app, topic) = self.topic_with_app(topic_id)?;
        Ok(permissions::effective_permission(app, topic, actor))
    }

    /// Fails `Unauthorized` unless `actor` is a topic admin.
    pub fn require_topic_admin(&self, topic_id: TopicId, actor: &Address) -> HeraldResult<()> {
        if self.is_topic_admin(topic_id, actor)? {
            Ok(())
        } else {
            warn!(topic_id = %topic_id, actor = %actor, "rejected: not topic admin");
            Err(HeraldError::unauthorized(*actor, Scope::Topic(topic_id)))
        }
    }

    fn check_name(&self, name: &str) -> HeraldResult<()> {
        if name.len() > self.config.max_name_len {
            return Err(HeraldError::LimitExceeded {
                field: "name",
                size: name.len(),
                max: self.config.max_name_len,
            });
        }
        Ok(())
    }
}
