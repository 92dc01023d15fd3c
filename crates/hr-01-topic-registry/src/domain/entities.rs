//! # Domain Entities
//!
//! Applications and topics, the records owned exclusively by the registry.

use super::value_objects::{AccessLevel, FeePolicy, PermissionLevel, Role, RoleSet};
use serde::{Deserialize, Serialize};
use shared_types::{Address, AppId, Timestamp, TopicId};
use std::collections::BTreeMap;

/// A namespace grouping topics and members under one owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Immutable once assigned.
    pub id: AppId,
    /// Always an implicit admin.
    pub owner: Address,
    /// Display name.
    pub name: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Members with at least one role. Members whose last role is removed are
    /// dropped, so absence means "no roles".
    members: BTreeMap<Address, RoleSet>,
}

impl Application {
    /// Creates an application with no members.
    #[must_use]
    pub fn new(id: AppId, owner: Address, name: String, created_at: Timestamp) -> Self {
        Self {
            id,
            owner,
            name,
            created_at,
            members: BTreeMap::new(),
        }
    }

    /// Roles held by `member` (empty if none). The owner always holds
    /// `Admin` on top of any stored roles.
    #[must_use]
    pub fn roles_of(&self, member: &Address) -> RoleSet {
        let mut roles = self.stored_roles(member);
        if *member == self.owner {
            roles.insert(Role::Admin);
        }
        roles
    }

    fn stored_roles(&self, member: &Address) -> RoleSet {
        self.members.get(member).copied().unwrap_or_default()
    }

    /// True if `actor` holds any role.
    #[must_use]
    pub fn is_member(&self, actor: &Address) -> bool {
        !self.roles_of(actor).is_empty()
    }

    /// True if `actor` is the owner or holds the admin role.
    #[must_use]
    pub fn is_admin(&self, actor: &Address) -> bool {
        self.roles_of(actor).contains(Role::Admin)
    }

    /// Number of members holding at least one role.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Sets or clears one role. Returns true if the member's roles changed.
    pub(crate) fn apply_role(&mut self, member: Address, role: Role, enabled: bool) -> bool {
        let mut roles = self.stored_roles(&member);
        let changed = if enabled {
            roles.insert(role)
        } else {
            roles.remove(role)
        };
        if roles.is_empty() {
            self.members.remove(&member);
        } else {
            self.members.insert(member, roles);
        }
        changed
    }
}

/// A channel within an application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Immutable once assigned.
    pub id: TopicId,
    /// Owning application; immutable.
    pub app_id: AppId,
    /// Topic owner; may differ from the application owner.
    pub owner: Address,
    /// Display name.
    pub name: String,
    /// Read/write policy.
    pub access_level: AccessLevel,
    /// Write fee policy.
    pub fee: FeePolicy,
    /// Creation time.
    pub created_at: Timestamp,
    /// Explicit grants. Absence means `PermissionLevel::None`.
    permissions: BTreeMap<Address, PermissionLevel>,
}

impl Topic {
    /// Creates a topic with no explicit grants.
    #[must_use]
    pub fn new(
        id: TopicId,
        app_id: AppId,
        owner: Address,
        spec: TopicSpec,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            app_id,
            owner,
            name: spec.name,
            access_level: spec.access_level,
            fee: spec.fee,
            created_at,
            permissions: BTreeMap::new(),
        }
    }

    /// Explicit permission of `user` (`None` if absent).
    #[must_use]
    pub fn permission_of(&self, user: &Address) -> PermissionLevel {
        self.permissions.get(user).copied().unwrap_or_default()
    }

    /// True if writes must attach an escrowed fee.
    #[must_use]
    pub const fn escrow_enabled(&self) -> bool {
        self.fee.escrow_enabled()
    }

    /// Iterates explicit grants.
    pub fn grants(&self) -> impl Iterator<Item = (&Address, &PermissionLevel)> {
        self.permissions.iter()
    }

    /// Stores a grant; `None` deletes the entry.
    pub(crate) fn apply_permission(&mut self, user: Address, level: PermissionLevel) {
        if level == PermissionLevel::None {
            self.permissions.remove(&user);
        } else {
            self.permissions.insert(user, level);
        }
    }
}

/// Parameters for creating a topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicSpec {
    /// Display name.
    pub name: String,
    /// Read/write policy.
    pub access_level: AccessLevel,
    /// Write fee policy.
    pub fee: FeePolicy,
}

impl TopicSpec {
    /// A free topic with the given access level.
    #[must_use]
    pub fn free(name: impl Into<String>, access_level: AccessLevel) -> Self {
        Self {
            name: name.into(),
            access_level,
            fee: FeePolicy::Free,
        }
    }

    /// Sets the fee policy.
    #[must_use]
    pub fn with_fee(mut self, fee: FeePolicy) -> Self {
        self.fee = fee;
        self
    }
}

/// Outcome of a role update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleChange {
    /// The member's roles changed.
    Applied,
    /// The role was already in the requested state.
    Unchanged,
}
