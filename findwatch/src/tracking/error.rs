//! Error types for tracking configuration.

use thiserror::Error;

use super::entity::{EntityId, EntityKind, EntityRef};

/// Errors raised when configuring what is tracked and how.
///
/// All of these are reported at the moment a value is set. Detection itself
/// never fails on configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Unknown entity configuration key.
    #[error("Unknown entity setting '{0}'")]
    UnknownKey(String),

    /// The value failed validation for the key.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// A device index does not refer to a device in the roster snapshot.
    #[error("Device index {index} is out of range ({available} devices available)")]
    TargetOutOfRange { index: usize, available: usize },

    /// A watch or remote alert is on but its device target is unset.
    #[error("{flag} is on, so {target} must select a device")]
    TargetRequired {
        flag: &'static str,
        target: &'static str,
    },

    /// No tracked entity has this id.
    #[error("No tracked entity with id {0}")]
    UnknownEntity(EntityId),

    /// Combined roster index is outside the snapshot.
    #[error("Roster index {index} is out of range ({available} entries available)")]
    RosterIndexOutOfRange { index: usize, available: usize },

    /// Reference is not part of the roster snapshot.
    #[error("No {kind} with reference '{reference}' in the roster")]
    UnknownReference { kind: EntityKind, reference: EntityRef },

    /// Entity is already tracked and duplicates are rejected.
    #[error("{0} is already being tracked")]
    AlreadyTracked(String),
}
