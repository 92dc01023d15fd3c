//! # Value Objects
//!
//! Roles, access levels, permission levels and fee policies. These are
//! defined by their value, not identity.

use serde::{Deserialize, Serialize};
use shared_types::{Amount, Token};
use std::fmt;

// =============================================================================
// ROLES
// =============================================================================

/// A role a member can hold within an application.
///
/// Roles are independent flags; a member may hold any combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Recognized member of the application.
    Member,
    /// Handles support requests.
    SupportManager,
    /// Manages topics.
    TopicManager,
    /// Application administrator; implies topic-admin rights app-wide.
    Admin,
    /// Acts on behalf of the owner.
    OwnerDelegate,
}

impl Role {
    /// Every role, in bit order.
    pub const ALL: [Role; 5] = [
        Role::Member,
        Role::SupportManager,
        Role::TopicManager,
        Role::Admin,
        Role::OwnerDelegate,
    ];

    const fn bit(self) -> u8 {
        match self {
            Role::Member => 1,
            Role::SupportManager => 2,
            Role::TopicManager => 4,
            Role::Admin => 8,
            Role::OwnerDelegate => 16,
        }
    }
}

/// The set of roles a member holds. The bitmask is never exposed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleSet(u8);

impl RoleSet {
    /// A set holding no roles.
    pub const EMPTY: Self = Self(0);

    /// Returns true if `role` is held.
    #[must_use]
    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    /// Adds `role`. Returns true if the set changed.
    pub fn insert(&mut self, role: Role) -> bool {
        let before = self.0;
        self.0 |= role.bit();
        before != self.0
    }

    /// Removes `role`. Returns true if the set changed.
    pub fn remove(&mut self, role: Role) -> bool {
        let before = self.0;
        self.0 &= !role.bit();
        before != self.0
    }

    /// Returns true if no role is held.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the held roles in bit order.
    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |role| self.contains(*role))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        let mut set = RoleSet::EMPTY;
        for role in iter {
            set.insert(role);
        }
        set
    }
}

// =============================================================================
// ACCESS & PERMISSION LEVELS
// =============================================================================

/// Who may read and write a topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    /// Anyone reads and writes.
    Public,
    /// Anyone reads; only application members write.
    PublicLimited,
    /// Explicit topic permission (or admin standing) required.
    Private,
}

/// Explicit per-user permission on a topic. Ordered: each level includes the
/// ones below it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PermissionLevel {
    /// No access. Also the meaning of an absent entry.
    #[default]
    None,
    /// May read.
    Read,
    /// May read and write.
    Write,
    /// Topic administrator.
    Admin,
}

impl PermissionLevel {
    /// Wire encoding used by the narrow directory interface.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Read => 1,
            Self::Write => 2,
            Self::Admin => 3,
        }
    }

    /// Decodes the wire encoding.
    #[must_use]
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::None),
            1 => Some(Self::Read),
            2 => Some(Self::Write),
            3 => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        };
        f.write_str(label)
    }
}

// =============================================================================
// FEE POLICY
// =============================================================================

/// How writes to a topic are charged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeePolicy {
    /// Writes are free; any attached fee is rejected.
    #[default]
    Free,
    /// Every write must attach exactly `amount` of `token`, held in escrow.
    Escrow {
        /// Fee asset.
        token: Token,
        /// Exact fee per message.
        amount: Amount,
    },
}

impl FeePolicy {
    /// Returns true if fees are escrowed.
    #[must_use]
    pub const fn escrow_enabled(&self) -> bool {
        matches!(self, Self::Escrow { .. })
    }

    /// The fee a write must attach (zero when free).
    #[must_use]
    pub fn required_fee(&self) -> Amount {
        match self {
            Self::Free => Amount::zero(),
            Self::Escrow { amount, .. } => *amount,
        }
    }
}
