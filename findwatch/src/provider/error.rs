//! Error types for location lookups.

use thiserror::Error;

use crate::tracking::{EntityKind, EntityRef};

/// Errors returned by a [`LocationProvider`](super::LocationProvider).
///
/// None of these are fatal to the detection engine. A failed lookup is
/// logged against the entity and retried on the next cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// The entity exists but currently has no location fix.
    #[error("No location fix for {kind} '{reference}'")]
    NoFix { kind: EntityKind, reference: EntityRef },

    /// The entity is not known to the account.
    #[error("Unknown {kind} '{reference}'")]
    UnknownEntity { kind: EntityKind, reference: EntityRef },

    /// The backing service or file could not be reached.
    #[error("Location service unavailable: {0}")]
    Unavailable(String),

    /// The backing data could not be understood.
    #[error("Failed to parse location data: {0}")]
    Parse(String),
}
