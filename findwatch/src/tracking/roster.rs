//! Roster snapshot and the ordered list of tracked entities.
//!
//! The [`RosterSnapshot`] is what the account knows about: every person
//! sharing a location and every registered device. It is fetched once per
//! session and never changes. The device list doubles as the index space for
//! proximity and remote-alert targets.
//!
//! [`TrackingRoster`] holds the entities the user chose to watch, in display
//! order.

use std::sync::Arc;

use super::entity::{
    EntityId, EntityKind, EntityRef, TrackedEntity, DEFAULT_THRESHOLD_METERS,
    DEFAULT_TOLERANCE_METERS,
};
use super::error::ConfigError;
use super::keys::EntityConfigKey;

/// One selectable person or device from the account.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub kind: EntityKind,
    pub reference: EntityRef,
    /// `"first last"` for persons, `"name (model)"` for devices.
    pub display_name: String,
}

impl RosterEntry {
    pub fn new(
        kind: EntityKind,
        reference: impl Into<EntityRef>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            reference: reference.into(),
            display_name: display_name.into(),
        }
    }

    /// Build a person entry from first and last name.
    pub fn person(reference: impl Into<EntityRef>, first: &str, last: &str) -> Self {
        let name = format!("{} {}", first, last).trim().to_string();
        Self::new(EntityKind::Person, reference, name)
    }

    /// Build a device entry from the device name and model display name.
    pub fn device(reference: impl Into<EntityRef>, name: &str, model: &str) -> Self {
        let display = if model.is_empty() {
            name.to_string()
        } else {
            format!("{} ({})", name, model)
        };
        Self::new(EntityKind::Device, reference, display)
    }
}

/// Immutable session roster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSnapshot {
    pub persons: Vec<RosterEntry>,
    pub devices: Vec<RosterEntry>,
}

impl RosterSnapshot {
    pub fn new(persons: Vec<RosterEntry>, devices: Vec<RosterEntry>) -> Self {
        Self { persons, devices }
    }

    /// Device by index into the device list.
    pub fn device(&self, index: usize) -> Option<&RosterEntry> {
        self.devices.get(index)
    }

    /// Entry by combined index: persons first, then devices.
    pub fn entry_at(&self, index: usize) -> Option<&RosterEntry> {
        if index < self.persons.len() {
            self.persons.get(index)
        } else {
            self.devices.get(index - self.persons.len())
        }
    }

    /// Look up an entry by kind and reference.
    pub fn find(&self, kind: EntityKind, reference: &EntityRef) -> Option<&RosterEntry> {
        let list = match kind {
            EntityKind::Person => &self.persons,
            EntityKind::Device => &self.devices,
        };
        list.iter().find(|e| &e.reference == reference)
    }

    /// Total number of entries (persons + devices).
    pub fn len(&self) -> usize {
        self.persons.len() + self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries in combined order.
    pub fn iter(&self) -> impl Iterator<Item = &RosterEntry> {
        self.persons.iter().chain(self.devices.iter())
    }

    /// Check that a device index is valid for this snapshot.
    pub fn check_device_index(&self, index: usize) -> Result<(), ConfigError> {
        if index < self.devices.len() {
            Ok(())
        } else {
            Err(ConfigError::TargetOutOfRange {
                index,
                available: self.devices.len(),
            })
        }
    }
}

/// What to do when an already-tracked entity is added again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Track another independent instance.
    #[default]
    Allow,
    /// Refuse with [`ConfigError::AlreadyTracked`].
    Reject,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Reject => "reject",
        }
    }
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown duplicate policy '{}'", other)),
        }
    }
}

/// Options applied when new entities are tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterOptions {
    pub duplicates: DuplicatePolicy,
    pub default_tolerance_meters: f64,
    pub default_threshold_meters: f64,
}

impl Default for RosterOptions {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::Allow,
            default_tolerance_meters: DEFAULT_TOLERANCE_METERS,
            default_threshold_meters: DEFAULT_THRESHOLD_METERS,
        }
    }
}

/// Ordered collection of tracked entities over a fixed snapshot.
#[derive(Debug, Clone)]
pub struct TrackingRoster {
    snapshot: Arc<RosterSnapshot>,
    entities: Vec<TrackedEntity>,
    next_id: u64,
    options: RosterOptions,
}

impl TrackingRoster {
    pub fn new(snapshot: RosterSnapshot) -> Self {
        Self::with_options(snapshot, RosterOptions::default())
    }

    pub fn with_options(snapshot: RosterSnapshot, options: RosterOptions) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            entities: Vec::new(),
            next_id: 1,
            options,
        }
    }

    pub fn snapshot(&self) -> &Arc<RosterSnapshot> {
        &self.snapshot
    }

    pub fn options(&self) -> &RosterOptions {
        &self.options
    }

    /// Start tracking the entry at a combined roster index.
    pub fn track(&mut self, index: usize) -> Result<EntityId, ConfigError> {
        let entry = self
            .snapshot
            .entry_at(index)
            .cloned()
            .ok_or(ConfigError::RosterIndexOutOfRange {
                index,
                available: self.snapshot.len(),
            })?;
        self.push(entry)
    }

    /// Start tracking an entity by kind and reference.
    pub fn track_reference(
        &mut self,
        kind: EntityKind,
        reference: &EntityRef,
    ) -> Result<EntityId, ConfigError> {
        let entry = self.snapshot.find(kind, reference).cloned().ok_or_else(|| {
            ConfigError::UnknownReference {
                kind,
                reference: reference.clone(),
            }
        })?;
        self.push(entry)
    }

    fn push(&mut self, entry: RosterEntry) -> Result<EntityId, ConfigError> {
        if self.options.duplicates == DuplicatePolicy::Reject
            && self.is_tracked(entry.kind, &entry.reference)
        {
            return Err(ConfigError::AlreadyTracked(entry.display_name));
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;

        tracing::debug!(id = %id, entity = %entry.display_name, "Tracking entity");
        let mut entity = TrackedEntity::with_defaults(
            id,
            entry,
            self.options.default_tolerance_meters,
            self.options.default_threshold_meters,
        );
        if !self.snapshot.devices.is_empty() {
            entity.target_device(0);
        }
        self.entities.push(entity);
        Ok(id)
    }

    /// Stop tracking an entity. Returns the removed record.
    pub fn untrack(&mut self, id: EntityId) -> Result<TrackedEntity, ConfigError> {
        let pos = self
            .entities
            .iter()
            .position(|e| e.id() == id)
            .ok_or(ConfigError::UnknownEntity(id))?;
        let removed = self.entities.remove(pos);
        tracing::debug!(id = %id, entity = %removed.display_name(), "Stopped tracking entity");
        Ok(removed)
    }

    /// True if any instance tracks this upstream entity.
    pub fn is_tracked(&self, kind: EntityKind, reference: &EntityRef) -> bool {
        self.entities
            .iter()
            .any(|e| e.kind() == kind && e.reference() == reference)
    }

    pub fn get(&self, id: EntityId) -> Option<&TrackedEntity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut TrackedEntity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    /// Tracked entity by display position.
    pub fn entity_at(&self, position: usize) -> Option<&TrackedEntity> {
        self.entities.get(position)
    }

    pub fn entity_at_mut(&mut self, position: usize) -> Option<&mut TrackedEntity> {
        self.entities.get_mut(position)
    }

    /// Tracked entities in display order.
    pub fn entities(&self) -> &[TrackedEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Set an entity setting by key name.
    pub fn set(&mut self, id: EntityId, key: &str, value: &str) -> Result<(), ConfigError> {
        let key: EntityConfigKey = key.parse()?;
        let snapshot = Arc::clone(&self.snapshot);
        let entity = self.get_mut(id).ok_or(ConfigError::UnknownEntity(id))?;
        key.set(entity, &snapshot, value)
    }

    /// Read an entity setting by key name.
    pub fn get_value(&self, id: EntityId, key: &str) -> Result<String, ConfigError> {
        let key: EntityConfigKey = key.parse()?;
        let entity = self.get(id).ok_or(ConfigError::UnknownEntity(id))?;
        Ok(key.get(entity))
    }
}
