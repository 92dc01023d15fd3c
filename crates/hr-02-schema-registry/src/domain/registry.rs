//! # Schema Registry
//!
//! Owns schemas, their version history and the topic → schema bindings.
//! Topic standing is checked through [`TopicDirectory`] only; the registry
//! never reads a topic record.
//!
//! ## Invariants Enforced
//!
//! - Version numbers are 1-based, strictly increasing and gapless.
//! - A `Latest` binding resolves at read time, never at bind time.
//! - Clearing a binding deletes it.
//! - Deactivation blocks new versions and new bindings; existing bindings
//!   keep resolving.

use super::entities::{Binding, ResolvedSchema, Schema, SchemaVersion, VersionSelector};
use crate::config::SchemaConfig;
use hr_01_topic_registry::ports::TopicDirectory;
use shared_types::{
    Address, HeraldError, HeraldResult, IdSequence, SchemaId, Scope, Timestamp, TopicId,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Schema registry state.
#[derive(Clone, Debug)]
pub struct SchemaRegistry {
    config: SchemaConfig,
    registry_owner: Address,
    schemas: BTreeMap<SchemaId, Schema>,
    by_creator: BTreeMap<Address, Vec<SchemaId>>,
    bindings: BTreeMap<TopicId, Binding>,
    ids: IdSequence<SchemaId>,
}

impl SchemaRegistry {
    /// Creates an empty registry. `registry_owner` may deactivate any schema.
    #[must_use]
    pub fn new(config: SchemaConfig, registry_owner: Address) -> Self {
        Self {
            config,
            registry_owner,
            schemas: BTreeMap::new(),
            by_creator: BTreeMap::new(),
            bindings: BTreeMap::new(),
            ids: IdSequence::new(),
        }
    }

    /// Process-wide registry owner.
    #[must_use]
    pub fn registry_owner(&self) -> Address {
        self.registry_owner
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Creates an active schema with `body` as version 1. Permissionless.
    ///
    /// # Errors
    /// - `LimitExceeded` if name, description or body is too large
    pub fn create_schema(
        &mut self,
        name: String,
        description: String,
        body: String,
        caller: Address,
        now: Timestamp,
    ) -> HeraldResult<SchemaId> {
        check_len("name", &name, self.config.max_name_len)?;
        check_len("description", &description, self.config.max_description_len)?;
        check_len("schema_body", &body, self.config.max_body_bytes)?;

        let id = self.ids.allocate();
        self.schemas
            .insert(id, Schema::new(id, name, description, body, caller, now));
        self.by_creator.entry(caller).or_default().push(id);
        info!(schema_id = %id, creator = %caller, "schema created");
        Ok(id)
    }

    /// Publishes the next version of a schema and returns its number.
    ///
    /// # Errors
    /// - `SchemaNotFound`
    /// - `Unauthorized` unless `caller` created the schema
    /// - `SchemaInactive` if the schema was deactivated
    /// - `LimitExceeded` if the body is too large
    pub fn publish_schema_version(
        &mut self,
        schema_id: SchemaId,
        body: String,
        caller: Address,
        now: Timestamp,
    ) -> HeraldResult<u32> {
        let max_body = self.config.max_body_bytes;
        let schema = self
            .schemas
            .get_mut(&schema_id)
            .ok_or(HeraldError::SchemaNotFound(schema_id))?;
        if caller != schema.creator {
            warn!(schema_id = %schema_id, caller = %caller, "publish rejected: not creator");
            return Err(HeraldError::unauthorized(caller, Scope::Schema(schema_id)));
        }
        if !schema.active {
            return Err(HeraldError::SchemaInactive(schema_id));
        }
        check_len("schema_body", &body, max_body)?;

        let version = schema.push_version(body, now);
        info!(schema_id = %schema_id, version, "schema version published");
        Ok(version)
    }

    /// Binds a topic to a schema. Returns the binding it replaced, if any.
    ///
    /// # Errors
    /// - `TopicNotFound`
    /// - `Unauthorized` unless `caller` is a topic admin
    /// - `SchemaNotFound`
    /// - `SchemaInactive`
    /// - `VersionNotFound` for a pinned version never published
    /// - `AlreadyBound` if the topic is bound and rebinding is disabled
    pub fn set_topic_schema(
        &mut self,
        directory: &impl TopicDirectory,
        topic_id: TopicId,
        schema_id: SchemaId,
        version: VersionSelector,
        caller: Address,
    ) -> HeraldResult<Option<Binding>> {
        require_topic_admin(directory, topic_id, &caller)?;

        let schema = self.schema(schema_id)?;
        if !schema.active {
            return Err(HeraldError::SchemaInactive(schema_id));
        }
        if let VersionSelector::Pinned(number) = version {
            if schema.version(number).is_none() {
                return Err(HeraldError::VersionNotFound {
                    schema: schema_id,
                    version: number,
                });
            }
        }
        if !self.config.allow_rebind && self.bindings.contains_key(&topic_id) {
            return Err(HeraldError::AlreadyBound(topic_id));
        }

        let binding = Binding {
            schema: schema_id,
            version,
        };
        let previous = self.bindings.insert(topic_id, binding);
        info!(topic_id = %topic_id, schema_id = %schema_id, ?version, rebound = previous.is_some(), "topic schema set");
        Ok(previous)
    }

    /// Deletes a topic's binding. Returns the removed binding; `None` means
    /// the topic was not bound, which is not an error.
    ///
    /// # Errors
    /// - `TopicNotFound`
    /// - `Unauthorized` unless `caller` is a topic admin
    pub fn clear_topic_schema(
        &mut self,
        directory: &impl TopicDirectory,
        topic_id: TopicId,
        caller: Address,
    ) -> HeraldResult<Option<Binding>> {
        require_topic_admin(directory, topic_id, &caller)?;

        let removed = self.bindings.remove(&topic_id);
        if removed.is_some() {
            info!(topic_id = %topic_id, "topic schema cleared");
        } else {
            debug!(topic_id = %topic_id, "clear on unbound topic");
        }
        Ok(removed)
    }

    /// Deactivates a schema. Returns false if it was already inactive.
    ///
    /// # Errors
    /// - `SchemaNotFound`
    /// - `Unauthorized` unless `caller` is the creator or the registry owner
    pub fn deactivate_schema(&mut self, schema_id: SchemaId, caller: Address) -> HeraldResult<bool> {
        let registry_owner = self.registry_owner;
        let schema = self
            .schemas
            .get_mut(&schema_id)
            .ok_or(HeraldError::SchemaNotFound(schema_id))?;
        if caller != schema.creator && caller != registry_owner {
            warn!(schema_id = %schema_id, caller = %caller, "deactivate rejected");
            return Err(HeraldError::unauthorized(caller, Scope::Schema(schema_id)));
        }

        let was_active = std::mem::replace(&mut schema.active, false);
        if was_active {
            info!(schema_id = %schema_id, by = %caller, "schema deactivated");
        } else {
            debug!(schema_id = %schema_id, "schema already inactive");
        }
        Ok(was_active)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Resolves a topic's binding to a concrete version. `None` if unbound.
    #[must_use]
    pub fn topic_schema(&self, topic_id: TopicId) -> Option<ResolvedSchema> {
        let binding = self.bindings.get(&topic_id)?;
        let schema = self.schemas.get(&binding.schema)?;
        let version = match binding.version {
            VersionSelector::Latest => schema.latest(),
            VersionSelector::Pinned(number) => schema.version(number)?,
        };
        Some(ResolvedSchema {
            schema_id: schema.id,
            version: version.number,
            body: version.body.clone(),
        })
    }

    /// The raw binding of a topic, without resolution.
    #[must_use]
    pub fn binding(&self, topic_id: TopicId) -> Option<Binding> {
        self.bindings.get(&topic_id).copied()
    }

    /// Looks up a schema.
    pub fn schema(&self, schema_id: SchemaId) -> HeraldResult<&Schema> {
        self.schemas
            .get(&schema_id)
            .ok_or(HeraldError::SchemaNotFound(schema_id))
    }

    /// Looks up one version of a schema.
    pub fn schema_version(&self, schema_id: SchemaId, version: u32) -> HeraldResult<&SchemaVersion> {
        self.schema(schema_id)?
            .version(version)
            .ok_or(HeraldError::VersionNotFound {
                schema: schema_id,
                version,
            })
    }

    /// Ids of schemas created by `creator`, in creation order.
    #[must_use]
    pub fn schemas_by_creator(&self, creator: &Address) -> &[SchemaId] {
        self.by_creator.get(creator).map_or(&[], Vec::as_slice)
    }

    /// Number of schemas ever created.
    #[must_use]
    pub fn schema_count(&self) -> u64 {
        self.ids.issued()
    }
}

fn require_topic_admin(
    directory: &impl TopicDirectory,
    topic_id: TopicId,
    caller: &Address,
) -> HeraldResult<()> {
    if !directory.topic_exists(topic_id) {
        return Err(HeraldError::TopicNotFound(topic_id));
    }
    if !directory.is_topic_admin(topic_id, caller) {
        warn!(topic_id = %topic_id, caller = %caller, "binding rejected: not topic admin");
        return Err(HeraldError::unauthorized(*caller, Scope::Topic(topic_id)));
    }
    Ok(())
}

fn check_len(field: &'static str, value: &str, max: usize) -> HeraldResult<()> {
    if value.len() > max {
        return Err(HeraldError::LimitExceeded {
            field,
            size: value.len(),
            max,
        });
    }
    Ok(())
}
