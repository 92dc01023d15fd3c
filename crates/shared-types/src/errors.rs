//! # Error Types
//!
//! The failure taxonomy shared by every Herald subsystem.
//!
//! All failures are local, synchronous and all-or-nothing: an operation that
//! returns an error has applied no state change. Variants carry the kind and
//! the entity id(s) involved, never internal state.

use crate::entities::{Address, Amount, AppId, SchemaId, TopicId};
use std::fmt;
use thiserror::Error;

/// The record an authorization check was performed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Application-level administration.
    Application(AppId),
    /// Topic read, write or administration.
    Topic(TopicId),
    /// Schema ownership.
    Schema(SchemaId),
    /// Escrow operator capability.
    Escrow,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application(id) => write!(f, "{id}"),
            Self::Topic(id) => write!(f, "{id}"),
            Self::Schema(id) => write!(f, "{id}"),
            Self::Escrow => write!(f, "escrow"),
        }
    }
}

/// Errors surfaced by any Herald operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeraldError {
    /// Actor lacks the standing required for the operation.
    #[error("unauthorized: {actor:?} on {scope}")]
    Unauthorized { actor: Address, scope: Scope },

    /// Application id was never assigned.
    #[error("application not found: {0}")]
    ApplicationNotFound(AppId),

    /// Topic id was never assigned.
    #[error("topic not found: {0}")]
    TopicNotFound(TopicId),

    /// Schema id was never assigned.
    #[error("schema not found: {0}")]
    SchemaNotFound(SchemaId),

    /// Schema exists but the requested version was never published.
    #[error("version {version} not found for {schema}")]
    VersionNotFound { schema: SchemaId, version: u32 },

    /// Schema has been deactivated.
    #[error("schema inactive: {0}")]
    SchemaInactive(SchemaId),

    /// A fee was attached to a topic that does not escrow fees, or a deposit
    /// targeted a topic the escrow was never told about.
    #[error("escrow disabled for {0}")]
    EscrowDisabled(TopicId),

    /// Deposit payee or token differs from the topic's established position.
    #[error("escrow configuration mismatch for {0}")]
    EscrowConfigMismatch(TopicId),

    /// Attached fee differs from the topic's configured fee.
    #[error("invalid fee for {topic}: expected {expected}, attached {attached}")]
    InvalidFeeAmount {
        topic: TopicId,
        expected: Amount,
        attached: Amount,
    },

    /// Topic already has a schema binding and rebinding is disabled.
    #[error("topic already bound: {0}")]
    AlreadyBound(TopicId),

    /// A call re-entered the state machine while an operation was running.
    #[error("reentrant call rejected")]
    ReentrantCall,

    /// A fee or deposit of zero where a positive amount is required.
    #[error("zero amount not allowed")]
    ZeroAmount,

    /// Accumulated escrow balance would overflow.
    #[error("escrow balance overflow for {0}")]
    AmountOverflow(TopicId),

    /// Input exceeds a configured size limit.
    #[error("{field} too large: {size} > {max}")]
    LimitExceeded {
        field: &'static str,
        size: usize,
        max: usize,
    },

    /// Escrow split is outside 0..=10000 basis points.
    #[error("invalid escrow split: {0} bps")]
    InvalidSplit(u16),

    /// The external ledger refused the settlement.
    #[error("ledger failure while releasing {topic}: {reason}")]
    LedgerFailure { topic: TopicId, reason: String },
}

/// Fieldless taxonomy kind of a [`HeraldError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    ApplicationNotFound,
    TopicNotFound,
    SchemaNotFound,
    VersionNotFound,
    SchemaInactive,
    EscrowDisabled,
    EscrowConfigMismatch,
    InvalidFeeAmount,
    AlreadyBound,
    ReentrantCall,
    ZeroAmount,
    AmountOverflow,
    LimitExceeded,
    InvalidSplit,
    LedgerFailure,
}

impl ErrorKind {
    /// Stable snake_case label, used as a metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::ApplicationNotFound => "application_not_found",
            Self::TopicNotFound => "topic_not_found",
            Self::SchemaNotFound => "schema_not_found",
            Self::VersionNotFound => "version_not_found",
            Self::SchemaInactive => "schema_inactive",
            Self::EscrowDisabled => "escrow_disabled",
            Self::EscrowConfigMismatch => "escrow_config_mismatch",
            Self::InvalidFeeAmount => "invalid_fee_amount",
            Self::AlreadyBound => "already_bound",
            Self::ReentrantCall => "reentrant_call",
            Self::ZeroAmount => "zero_amount",
            Self::AmountOverflow => "amount_overflow",
            Self::LimitExceeded => "limit_exceeded",
            Self::InvalidSplit => "invalid_split",
            Self::LedgerFailure => "ledger_failure",
        }
    }
}

impl HeraldError {
    /// Shorthand for [`HeraldError::Unauthorized`].
    #[must_use]
    pub fn unauthorized(actor: Address, scope: Scope) -> Self {
        Self::Unauthorized { actor, scope }
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::ApplicationNotFound(_) => ErrorKind::ApplicationNotFound,
            Self::TopicNotFound(_) => ErrorKind::TopicNotFound,
            Self::SchemaNotFound(_) => ErrorKind::SchemaNotFound,
            Self::VersionNotFound { .. } => ErrorKind::VersionNotFound,
            Self::SchemaInactive(_) => ErrorKind::SchemaInactive,
            Self::EscrowDisabled(_) => ErrorKind::EscrowDisabled,
            Self::EscrowConfigMismatch(_) => ErrorKind::EscrowConfigMismatch,
            Self::InvalidFeeAmount { .. } => ErrorKind::InvalidFeeAmount,
            Self::AlreadyBound(_) => ErrorKind::AlreadyBound,
            Self::ReentrantCall => ErrorKind::ReentrantCall,
            Self::ZeroAmount => ErrorKind::ZeroAmount,
            Self::AmountOverflow(_) => ErrorKind::AmountOverflow,
            Self::LimitExceeded { .. } => ErrorKind::LimitExceeded,
            Self::InvalidSplit(_) => ErrorKind::InvalidSplit,
            Self::LedgerFailure { .. } => ErrorKind::LedgerFailure,
        }
    }
}

/// Result alias used throughout Herald.
pub type HeraldResult<T> = Result<T, HeraldError>;
