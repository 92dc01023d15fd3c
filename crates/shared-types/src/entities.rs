//! # Core Entities
//!
//! Value types shared by all subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `Token`
//! - **Record ids**: `AppId`, `TopicId`, `SchemaId`, `MessageId`, `IdSequence`
//! - **Value**: `Amount` (256-bit), `Timestamp`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// Fee and escrow amounts, in the smallest unit of the fee token.
pub type Amount = U256;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account address identifying an actor.
///
/// Serialized as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address whose every byte is `byte`. Handy in tests.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

/// Error returned when parsing an [`Address`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    /// Input is not valid hex.
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),

    /// Input decodes to the wrong number of bytes.
    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(digits).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        let array: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressParseError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{self:?}"))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TOKEN
// =============================================================================

/// The asset a topic fee is denominated in, identified by its contract address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Token(pub Address);

impl Token {
    /// The chain's native asset.
    pub const NATIVE: Self = Self(Address::ZERO);

    /// Returns true for the native asset.
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "native")
        } else {
            write!(f, "token:{}", self.0)
        }
    }
}

// =============================================================================
// RECORD IDS
// =============================================================================

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            /// Wraps a raw id.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw id.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of an application namespace.
    AppId,
    "app"
);
record_id!(
    /// Identifier of a topic (channel).
    TopicId,
    "topic"
);
record_id!(
    /// Identifier of a schema definition.
    SchemaId,
    "schema"
);
record_id!(
    /// Identifier of a recorded message.
    MessageId,
    "message"
);

/// Monotonic id allocator.
///
/// Ids start at 1 and are never reused, even if the record is later removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdSequence<I> {
    issued: u64,
    _marker: PhantomData<I>,
}

impl<I: From<u64>> IdSequence<I> {
    /// Creates a sequence that has issued nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: 0,
            _marker: PhantomData,
        }
    }

    /// The id the next call to [`IdSequence::allocate`] will return.
    #[must_use]
    pub fn peek_next(&self) -> I {
        I::from(self.issued + 1)
    }

    /// Issues the next id.
    pub fn allocate(&mut self) -> I {
        self.issued += 1;
        I::from(self.issued)
    }

    /// Number of ids issued so far; also the highest id issued.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.issued
    }
}

impl<I: From<u64>> Default for IdSequence<I> {
    fn default() -> Self {
        Self::new()
    }
}
