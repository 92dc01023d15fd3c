//! # Domain Entities
//!
//! Schemas, their published versions, and topic bindings.

use serde::{Deserialize, Serialize};
use shared_types::{Address, SchemaId, Timestamp};

/// One immutable published body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// 1-based version number.
    pub number: u32,
    /// Opaque schema text. Never parsed.
    pub body: String,
    /// Publication time.
    pub published_at: Timestamp,
}

/// A named, versioned description of a topic's message structure.
///
/// Deserialization rejects records whose versions are missing or not
/// numbered 1, 2, 3, ... in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemaRecord")]
pub struct Schema {
    /// Immutable once assigned.
    pub id: SchemaId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Only the creator may publish new versions.
    pub creator: Address,
    /// Creation time.
    pub created_at: Timestamp,
    /// Inactive schemas accept no new versions or bindings.
    pub active: bool,
    versions: Vec<SchemaVersion>,
}

impl Schema {
    /// Creates an active schema whose version 1 is `body`.
    #[must_use]
    pub fn new(
        id: SchemaId,
        name: String,
        description: String,
        body: String,
        creator: Address,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            description,
            creator,
            created_at,
            active: true,
            versions: vec![SchemaVersion {
                number: 1,
                body,
                published_at: created_at,
            }],
        }
    }

    /// Number of published versions; also the latest version number.
    #[must_use]
    pub fn version_count(&self) -> u32 {
        self.latest().number
    }

    /// Latest published version. A schema always has at least one.
    #[must_use]
    pub fn latest(&self) -> &SchemaVersion {
        // Constructed with version 1 and never shrinks.
        &self.versions[self.versions.len() - 1]
    }

    /// Looks up a specific version. Version 0 is never stored.
    #[must_use]
    pub fn version(&self, number: u32) -> Option<&SchemaVersion> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.versions.get(index)
    }

    /// All versions in publication order.
    #[must_use]
    pub fn versions(&self) -> &[SchemaVersion] {
        &self.versions
    }

    /// Appends the next version and returns its number.
    pub(crate) fn push_version(&mut self, body: String, published_at: Timestamp) -> u32 {
        let number = self.version_count() + 1;
        self.versions.push(SchemaVersion {
            number,
            body,
            published_at,
        });
        number
    }
}

/// Unchecked wire form of [`Schema`].
#[derive(Deserialize)]
struct SchemaRecord {
    id: SchemaId,
    name: String,
    description: String,
    creator: Address,
    created_at: Timestamp,
    active: bool,
    versions: Vec<SchemaVersion>,
}

impl TryFrom<SchemaRecord> for Schema {
    type Error = String;

    fn try_from(record: SchemaRecord) -> Result<Self, Self::Error> {
        if record.versions.is_empty() {
            return Err(format!("{} has no versions", record.id));
        }
        for (expected, version) in (1u32..).zip(&record.versions) {
            if version.number != expected {
                return Err(format!(
                    "{} version {} found where {expected} was expected",
                    record.id, version.number
                ));
            }
        }
        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            creator: record.creator,
            created_at: record.created_at,
            active: record.active,
            versions: record.versions,
        })
    }
}

/// Which version a topic binding resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionSelector {
    /// Whatever the latest version is at read time.
    Latest,
    /// A fixed version number (>= 1).
    Pinned(u32),
}

impl VersionSelector {
    /// Maps the wire encoding, where 0 means latest.
    #[must_use]
    pub const fn from_raw(version: u32) -> Self {
        if version == 0 {
            Self::Latest
        } else {
            Self::Pinned(version)
        }
    }

    /// Wire encoding: 0 for latest.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        match self {
            Self::Latest => 0,
            Self::Pinned(v) => v,
        }
    }
}

/// A topic's association with a schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Bound schema.
    pub schema: SchemaId,
    /// Version selector.
    pub version: VersionSelector,
}

/// The answer to "what schema does this topic use right now".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSchema {
    /// Bound schema.
    pub schema_id: SchemaId,
    /// Concrete version after resolving `Latest`.
    pub version: u32,
    /// Body of that version.
    pub body: String,
}
