//! Tracked entity record and its detection state.
//!
//! A [`TrackedEntity`] pairs an upstream identity (person or device) with the
//! user's watch settings and the state the detection engine keeps between
//! cycles:
//!
//! - [`MovementState`] - movement baseline (`NoBaseline` → `Armed`)
//! - proximity latch - only used by the `OnEntry` debounce policy
//! - [`ActivityLog`] - timestamped history shown to the user

use std::fmt;
use std::str::FromStr;

use super::activity::ActivityLog;
use super::roster::RosterEntry;
use crate::coord::Coordinate;

/// Default movement tolerance in meters.
pub const DEFAULT_TOLERANCE_METERS: f64 = 500.0;

/// Default proximity threshold in meters.
pub const DEFAULT_THRESHOLD_METERS: f64 = 500.0;

/// What kind of upstream identity an entity is.
///
/// Persons are located through the account's shared-location list, devices
/// through their own location lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A person sharing their location with the account.
    Person,
    /// A device registered to the account.
    Device,
}

impl EntityKind {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Device => "device",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "person" | "friend" => Ok(Self::Person),
            "device" => Ok(Self::Device),
            other => Err(format!(
                "unknown entity kind '{}' (expected 'person' or 'device')",
                other
            )),
        }
    }
}

/// Opaque handle to an upstream identity (friend id or device id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef(String);

impl EntityRef {
    /// Wrap an upstream identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EntityRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Session-unique id of a tracked instance.
///
/// Two tracked instances of the same upstream entity get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Movement watch settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementConfig {
    /// Whether movement is watched at all.
    pub enabled: bool,
    /// Distance from the baseline that counts as having moved.
    pub tolerance_meters: f64,
    /// Speak the alert aloud.
    pub audio_alert: bool,
    /// Send the alert to a device from the roster.
    pub remote_alert: bool,
    /// Index into the roster's device list for the remote alert.
    pub remote_target_index: Option<usize>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tolerance_meters: DEFAULT_TOLERANCE_METERS,
            audio_alert: false,
            remote_alert: false,
            remote_target_index: None,
        }
    }
}

/// Proximity watch settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityConfig {
    /// Whether proximity is watched at all.
    pub enabled: bool,
    /// Index into the roster's device list of the reference device.
    pub target_index: Option<usize>,
    /// Distance below which the entity counts as near the reference.
    pub threshold_meters: f64,
    /// Speak the alert aloud.
    pub audio_alert: bool,
    /// Send the alert to a device from the roster.
    pub remote_alert: bool,
    /// Index into the roster's device list for the remote alert.
    pub remote_target_index: Option<usize>,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            target_index: None,
            threshold_meters: DEFAULT_THRESHOLD_METERS,
            audio_alert: false,
            remote_alert: false,
            remote_target_index: None,
        }
    }
}

/// Movement baseline state.
///
/// While movement is watched the baseline only advances when movement is
/// detected, so slow drift keeps accumulating against a fixed reference
/// point. While the watch is off it follows every fix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementState {
    /// No fix has been compared yet.
    #[default]
    NoBaseline,
    /// Baseline set, awaiting the next comparison.
    Armed(Coordinate),
}

impl MovementState {
    /// The baseline coordinate, if armed.
    pub fn baseline(&self) -> Option<Coordinate> {
        match self {
            Self::NoBaseline => None,
            Self::Armed(c) => Some(*c),
        }
    }
}

/// One tracked person or device.
#[derive(Debug, Clone)]
pub struct TrackedEntity {
    id: EntityId,
    entry: RosterEntry,
    pub(crate) movement: MovementConfig,
    pub(crate) proximity: ProximityConfig,
    pub(crate) baseline: MovementState,
    pub(crate) proximity_latched: bool,
    pub(crate) log: ActivityLog,
}

impl TrackedEntity {
    /// Create a tracked instance with default watch settings.
    pub fn new(id: EntityId, entry: RosterEntry) -> Self {
        Self {
            id,
            entry,
            movement: MovementConfig::default(),
            proximity: ProximityConfig::default(),
            baseline: MovementState::NoBaseline,
            proximity_latched: false,
            log: ActivityLog::new(),
        }
    }

    /// Create a tracked instance whose distances start from custom defaults.
    pub fn with_defaults(
        id: EntityId,
        entry: RosterEntry,
        tolerance_meters: f64,
        threshold_meters: f64,
    ) -> Self {
        let mut entity = Self::new(id, entry);
        entity.movement.tolerance_meters = tolerance_meters;
        entity.proximity.threshold_meters = threshold_meters;
        entity
    }

    /// Point every device target at `index`.
    ///
    /// New entities start aimed at the first device of a non-empty roster,
    /// so enabling proximity or a remote alert always has a target.
    pub(crate) fn target_device(&mut self, index: usize) {
        self.movement.remote_target_index = Some(index);
        self.proximity.target_index = Some(index);
        self.proximity.remote_target_index = Some(index);
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.entry.kind
    }

    pub fn reference(&self) -> &EntityRef {
        &self.entry.reference
    }

    pub fn display_name(&self) -> &str {
        &self.entry.display_name
    }

    /// The roster entry this instance was created from.
    pub fn entry(&self) -> &RosterEntry {
        &self.entry
    }

    pub fn movement(&self) -> &MovementConfig {
        &self.movement
    }

    pub fn proximity(&self) -> &ProximityConfig {
        &self.proximity
    }

    pub fn movement_state(&self) -> MovementState {
        self.baseline
    }

    /// Location used as the movement reference point.
    ///
    /// Set on the first compared fix and then only when movement is detected,
    /// never on every poll.
    pub fn last_known_location(&self) -> Option<Coordinate> {
        self.baseline.baseline()
    }

    /// True while an `OnEntry` proximity alert has fired and the entity has
    /// not left range since.
    pub fn proximity_latched(&self) -> bool {
        self.proximity_latched
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    /// Whether any enabled watch wants audio alerts.
    pub fn wants_audio(&self) -> bool {
        (self.movement.enabled && self.movement.audio_alert)
            || (self.proximity.enabled && self.proximity.audio_alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> RosterEntry {
        RosterEntry::new(EntityKind::Device, "dev-1", "Alice's Phone (iPhone 15)")
    }

    #[test]
    fn test_entity_kind_parse() {
        assert_eq!("person".parse::<EntityKind>().unwrap(), EntityKind::Person);
        assert_eq!("Friend".parse::<EntityKind>().unwrap(), EntityKind::Person);
        assert_eq!("DEVICE".parse::<EntityKind>().unwrap(), EntityKind::Device);
        assert!("car".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_entity_kind_display() {
        assert_eq!(EntityKind::Person.to_string(), "person");
        assert_eq!(EntityKind::Device.to_string(), "device");
    }

    #[test]
    fn test_new_entity_defaults() {
        let entity = TrackedEntity::new(EntityId(1), entry());

        assert_eq!(entity.id(), EntityId(1));
        assert_eq!(entity.kind(), EntityKind::Device);
        assert_eq!(entity.reference().as_str(), "dev-1");
        assert_eq!(entity.display_name(), "Alice's Phone (iPhone 15)");

        assert!(!entity.movement().enabled);
        assert_eq!(entity.movement().tolerance_meters, 500.0);
        assert!(!entity.proximity().enabled);
        assert_eq!(entity.proximity().threshold_meters, 500.0);
        assert!(entity.proximity().target_index.is_none());

        assert_eq!(entity.movement_state(), MovementState::NoBaseline);
        assert!(entity.last_known_location().is_none());
        assert!(!entity.proximity_latched());
        assert!(entity.log().is_empty());
    }

    #[test]
    fn test_with_defaults_overrides_distances() {
        let entity = TrackedEntity::with_defaults(EntityId(2), entry(), 250.0, 1000.0);
        assert_eq!(entity.movement().tolerance_meters, 250.0);
        assert_eq!(entity.proximity().threshold_meters, 1000.0);
    }

    #[test]
    fn test_wants_audio_requires_enabled_watch() {
        let mut entity = TrackedEntity::new(EntityId(3), entry());
        entity.movement.audio_alert = true;
        assert!(!entity.wants_audio(), "audio flag alone is not enough");

        entity.movement.enabled = true;
        assert!(entity.wants_audio());

        entity.movement.enabled = false;
        entity.proximity.enabled = true;
        entity.proximity.audio_alert = true;
        assert!(entity.wants_audio());
    }

    #[test]
    fn test_movement_state_baseline() {
        let c = Coordinate::new(1.0, 2.0);
        assert_eq!(MovementState::Armed(c).baseline(), Some(c));
        assert_eq!(MovementState::NoBaseline.baseline(), None);
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId(7).to_string(), "#7");
    }
}
