//! Location provider abstraction.
//!
//! The detection engine never talks to the account service directly. It asks
//! a [`LocationProvider`] for the session roster once and for individual
//! fixes on every cycle.
//!
//! [`SnapshotFileProvider`] reads a JSON document maintained by an external
//! bridge to the account service.

mod error;
mod snapshot;

pub use error::LocationError;
pub use snapshot::{SnapshotDocument, SnapshotFileProvider, SnapshotLocation, SnapshotRecord};

use std::future::Future;
use std::sync::Arc;

use crate::coord::Coordinate;
use crate::tracking::{EntityKind, EntityRef, RosterSnapshot};

/// Source of roster and location data.
///
/// Persons are looked up through the account's shared-location list and
/// devices through their own location. Implementations decide how.
pub trait LocationProvider: Send + Sync {
    /// Fetch the roster of selectable persons and devices.
    ///
    /// Called once at session start.
    fn roster(&self) -> impl Future<Output = Result<RosterSnapshot, LocationError>> + Send;

    /// Fetch the current location of one entity.
    fn current_location(
        &self,
        kind: EntityKind,
        reference: &EntityRef,
    ) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;
}

impl<T: LocationProvider> LocationProvider for Arc<T> {
    fn roster(&self) -> impl Future<Output = Result<RosterSnapshot, LocationError>> + Send {
        (**self).roster()
    }

    fn current_location(
        &self,
        kind: EntityKind,
        reference: &EntityRef,
    ) -> impl Future<Output = Result<Coordinate, LocationError>> + Send {
        (**self).current_location(kind, reference)
    }
}
