//! # Event Journal
//!
//! One event per committed state change, in commit order. Rejected
//! operations and no-op calls record nothing.
//!
//! The journal is bounded: embedders that never drain it lose the oldest
//! entries once it is full, never memory.

use hr_01_topic_registry::domain::{AccessLevel, PermissionLevel, Role};
use hr_02_schema_registry::domain::VersionSelector;
use hr_03_message_escrow::ports::Payout;
use serde::Serialize;
use shared_types::{Address, Amount, AppId, MessageId, SchemaId, Token, TopicId};
use std::collections::VecDeque;
use tracing::warn;

/// A committed state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeraldEvent {
    /// An application was created.
    ApplicationCreated {
        /// New id.
        app_id: AppId,
        /// Owner.
        owner: Address,
    },
    /// A topic was created.
    TopicCreated {
        /// New id.
        topic_id: TopicId,
        /// Owning application.
        app_id: AppId,
        /// Topic owner.
        owner: Address,
        /// Initial access level.
        access_level: AccessLevel,
        /// Whether writes are escrowed.
        escrow: bool,
    },
    /// A member role changed.
    RoleUpdated {
        /// Application.
        app_id: AppId,
        /// Member.
        member: Address,
        /// Role toggled.
        role: Role,
        /// New state of the role.
        enabled: bool,
    },
    /// An explicit topic permission was set or removed.
    TopicPermissionUpdated {
        /// Topic.
        topic_id: TopicId,
        /// User.
        user: Address,
        /// New level; `None` means removed.
        level: PermissionLevel,
    },
    /// A topic's access level changed.
    TopicAccessLevelUpdated {
        /// Topic.
        topic_id: TopicId,
        /// New level.
        access_level: AccessLevel,
    },
    /// A message was recorded.
    MessageSent {
        /// Message id.
        message_id: MessageId,
        /// Topic.
        topic_id: TopicId,
        /// Author.
        sender: Address,
        /// Position within the topic.
        sequence: u64,
    },
    /// A fee was moved into escrow.
    DepositRecorded {
        /// Topic.
        topic_id: TopicId,
        /// Paying sender.
        sender: Address,
        /// Fee token.
        token: Token,
        /// Amount.
        amount: Amount,
    },
    /// Escrow was settled and cleared.
    EscrowReleased {
        /// Topic.
        topic_id: TopicId,
        /// Sum released.
        total: Amount,
        /// Payouts applied by the ledger.
        payouts: Vec<Payout>,
    },
    /// A schema was created with version 1.
    SchemaCreated {
        /// New id.
        schema_id: SchemaId,
        /// Creator.
        creator: Address,
    },
    /// A new schema version was published.
    SchemaVersionPublished {
        /// Schema.
        schema_id: SchemaId,
        /// New version number.
        version: u32,
    },
    /// A topic was bound (or rebound) to a schema.
    TopicSchemaSet {
        /// Topic.
        topic_id: TopicId,
        /// Schema.
        schema_id: SchemaId,
        /// Version selector.
        version: VersionSelector,
    },
    /// A topic binding was deleted.
    TopicSchemaCleared {
        /// Topic.
        topic_id: TopicId,
    },
    /// A schema was deactivated.
    SchemaDeactivated {
        /// Schema.
        schema_id: SchemaId,
        /// Who deactivated it.
        by: Address,
    },
}

/// Bounded buffer of committed, undrained events.
#[derive(Clone, Debug)]
pub struct Journal {
    events: VecDeque<HeraldEvent>,
    capacity: usize,
    evicted: u64,
}

impl Journal {
    /// Empty journal holding at most `capacity` events (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
            evicted: 0,
        }
    }

    /// Appends an event, evicting the oldest if full.
    pub fn push(&mut self, event: HeraldEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.evicted += 1;
            warn!(capacity = self.capacity, evicted = self.evicted, "journal full, oldest event dropped");
        }
        self.events.push_back(event);
    }

    /// Removes and returns every buffered event, oldest first.
    pub fn drain(&mut self) -> Vec<HeraldEvent> {
        self.events.drain(..).collect()
    }

    /// Buffered event count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events dropped for lack of room since creation.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}
