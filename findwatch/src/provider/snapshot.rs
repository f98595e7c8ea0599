//! File-backed location provider.
//!
//! An external bridge signs in to the account service and periodically
//! writes what it sees to a JSON document:
//!
//! ```json
//! {
//!   "persons": [
//!     { "id": "p-1", "first_name": "Alice", "last_name": "Smith",
//!       "location": { "latitude": 51.5, "longitude": -0.12 } }
//!   ],
//!   "devices": [
//!     { "id": "d-1", "name": "Alice's iPhone", "model": "iPhone 15",
//!       "location": null }
//!   ]
//! }
//! ```
//!
//! The document is re-read on every lookup so fresh fixes are always seen.
//! A `null` location means the entity currently has no fix.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{LocationError, LocationProvider};
use crate::coord::Coordinate;
use crate::tracking::{EntityKind, EntityRef, RosterEntry, RosterSnapshot};

/// Location as written by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// One person or device in the snapshot document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Device model display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub location: Option<SnapshotLocation>,
}

impl SnapshotRecord {
    fn person_entry(&self) -> RosterEntry {
        match (&self.first_name, &self.last_name) {
            (None, None) => RosterEntry::new(
                EntityKind::Person,
                self.id.as_str(),
                self.name.clone().unwrap_or_else(|| self.id.clone()),
            ),
            (first, last) => RosterEntry::person(
                self.id.as_str(),
                first.as_deref().unwrap_or(""),
                last.as_deref().unwrap_or(""),
            ),
        }
    }

    fn device_entry(&self) -> RosterEntry {
        RosterEntry::device(
            self.id.as_str(),
            self.name.as_deref().unwrap_or(&self.id),
            self.model.as_deref().unwrap_or(""),
        )
    }
}

/// Whole snapshot document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub persons: Vec<SnapshotRecord>,
    #[serde(default)]
    pub devices: Vec<SnapshotRecord>,
}

impl SnapshotDocument {
    /// Roster view of the document, persons first.
    pub fn to_roster(&self) -> RosterSnapshot {
        RosterSnapshot::new(
            self.persons.iter().map(SnapshotRecord::person_entry).collect(),
            self.devices.iter().map(SnapshotRecord::device_entry).collect(),
        )
    }

    /// Location of one entity.
    pub fn location_of(
        &self,
        kind: EntityKind,
        reference: &EntityRef,
    ) -> Result<Coordinate, LocationError> {
        let records = match kind {
            EntityKind::Person => &self.persons,
            EntityKind::Device => &self.devices,
        };
        let record = records
            .iter()
            .find(|r| r.id == reference.as_str())
            .ok_or_else(|| LocationError::UnknownEntity {
                kind,
                reference: reference.clone(),
            })?;

        let location = record.location.ok_or_else(|| LocationError::NoFix {
            kind,
            reference: reference.clone(),
        })?;

        Coordinate::try_new(location.latitude, location.longitude)
            .map_err(|e| LocationError::Parse(e.to_string()))
    }
}

/// Provider that reads a [`SnapshotDocument`] from disk.
#[derive(Debug, Clone)]
pub struct SnapshotFileProvider {
    path: PathBuf,
}

impl SnapshotFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document.
    pub async fn load(&self) -> Result<SnapshotDocument, LocationError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            LocationError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;

        serde_json::from_slice(&bytes).map_err(|e| LocationError::Parse(e.to_string()))
    }
}

impl LocationProvider for SnapshotFileProvider {
    async fn roster(&self) -> Result<RosterSnapshot, LocationError> {
        let document = self.load().await?;
        let roster = document.to_roster();

        tracing::debug!(
            path = %self.path.display(),
            persons = roster.persons.len(),
            devices = roster.devices.len(),
            "Snapshot roster loaded"
        );

        Ok(roster)
    }

    async fn current_location(
        &self,
        kind: EntityKind,
        reference: &EntityRef,
    ) -> Result<Coordinate, LocationError> {
        self.load().await?.location_of(kind, reference)
    }
}
