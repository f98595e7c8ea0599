//! Per-entity setting keys.
//!
//! Every watch setting of a [`TrackedEntity`] is addressable by a dotted key
//! name (`movement.tolerance`, `proximity.target`, ...). The legacy field
//! names of the desktop tool's settings form are accepted as aliases, so
//! saved watch lists from either spelling load the same way.

use std::str::FromStr;

use super::entity::TrackedEntity;
use super::error::ConfigError;
use super::roster::RosterSnapshot;
use crate::config::spec::{
    parse_bool, parse_distance, parse_optional_index, BooleanSpec, DistanceSpec,
    OptionalIndexSpec, ValueSpecification,
};

/// A named entity setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityConfigKey {
    MovementEnabled,
    MovementTolerance,
    MovementAudio,
    MovementRemote,
    MovementRemoteTarget,
    ProximityEnabled,
    ProximityTarget,
    ProximityDistance,
    ProximityAudio,
    ProximityRemote,
    ProximityRemoteTarget,
}

impl FromStr for EntityConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movement.enabled" | "watch_movement" => Ok(Self::MovementEnabled),
            "movement.tolerance" | "tolerance" => Ok(Self::MovementTolerance),
            "movement.audio" | "watch_movement_audio" => Ok(Self::MovementAudio),
            "movement.remote" | "watch_movement_device_cb" => Ok(Self::MovementRemote),
            "movement.remote_target" | "watch_movement_device_adb" => {
                Ok(Self::MovementRemoteTarget)
            }
            "proximity.enabled" | "watch_proximity" => Ok(Self::ProximityEnabled),
            "proximity.target" | "proximity_to" => Ok(Self::ProximityTarget),
            "proximity.distance" | "distance" => Ok(Self::ProximityDistance),
            "proximity.audio" | "watch_proximity_audio" => Ok(Self::ProximityAudio),
            "proximity.remote" | "watch_proximity_device_cb" => Ok(Self::ProximityRemote),
            "proximity.remote_target" | "watch_proximity_device_adb" => {
                Ok(Self::ProximityRemoteTarget)
            }
            _ => Err(ConfigError::UnknownKey(s.to_string())),
        }
    }
}

impl EntityConfigKey {
    /// Canonical key name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MovementEnabled => "movement.enabled",
            Self::MovementTolerance => "movement.tolerance",
            Self::MovementAudio => "movement.audio",
            Self::MovementRemote => "movement.remote",
            Self::MovementRemoteTarget => "movement.remote_target",
            Self::ProximityEnabled => "proximity.enabled",
            Self::ProximityTarget => "proximity.target",
            Self::ProximityDistance => "proximity.distance",
            Self::ProximityAudio => "proximity.audio",
            Self::ProximityRemote => "proximity.remote",
            Self::ProximityRemoteTarget => "proximity.remote_target",
        }
    }

    /// Field name used by the desktop tool's settings form.
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Self::MovementEnabled => "watch_movement",
            Self::MovementTolerance => "tolerance",
            Self::MovementAudio => "watch_movement_audio",
            Self::MovementRemote => "watch_movement_device_cb",
            Self::MovementRemoteTarget => "watch_movement_device_adb",
            Self::ProximityEnabled => "watch_proximity",
            Self::ProximityTarget => "proximity_to",
            Self::ProximityDistance => "distance",
            Self::ProximityAudio => "watch_proximity_audio",
            Self::ProximityRemote => "watch_proximity_device_cb",
            Self::ProximityRemoteTarget => "watch_proximity_device_adb",
        }
    }

    /// Current value as a string. Unset targets render as empty.
    pub fn get(&self, entity: &TrackedEntity) -> String {
        let m = entity.movement();
        let p = entity.proximity();
        match self {
            Self::MovementEnabled => m.enabled.to_string(),
            Self::MovementTolerance => m.tolerance_meters.to_string(),
            Self::MovementAudio => m.audio_alert.to_string(),
            Self::MovementRemote => m.remote_alert.to_string(),
            Self::MovementRemoteTarget => index_to_string(m.remote_target_index),
            Self::ProximityEnabled => p.enabled.to_string(),
            Self::ProximityTarget => index_to_string(p.target_index),
            Self::ProximityDistance => p.threshold_meters.to_string(),
            Self::ProximityAudio => p.audio_alert.to_string(),
            Self::ProximityRemote => p.remote_alert.to_string(),
            Self::ProximityRemoteTarget => index_to_string(p.remote_target_index),
        }
    }

    /// Validate and apply a value.
    ///
    /// Device indices are checked against the snapshot's device list here,
    /// so a bad target never reaches the detection engine. A change that
    /// would leave an enabled watch or remote alert without a valid device
    /// is rejected and the entity keeps its previous settings.
    pub fn set(
        &self,
        entity: &mut TrackedEntity,
        snapshot: &RosterSnapshot,
        value: &str,
    ) -> Result<(), ConfigError> {
        let movement = entity.movement.clone();
        let proximity = entity.proximity.clone();
        let latched = entity.proximity_latched;

        self.apply(entity, snapshot, value)?;
        if let Err(e) = check_targets(entity, snapshot) {
            entity.movement = movement;
            entity.proximity = proximity;
            entity.proximity_latched = latched;
            return Err(e);
        }
        Ok(())
    }

    fn apply(
        &self,
        entity: &mut TrackedEntity,
        snapshot: &RosterSnapshot,
        value: &str,
    ) -> Result<(), ConfigError> {
        self.validate(value)?;
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: self.name().to_string(),
            reason,
        };

        match self {
            Self::MovementEnabled => entity.movement.enabled = parse_bool(value).map_err(invalid)?,
            Self::MovementTolerance => {
                entity.movement.tolerance_meters = parse_distance(value).map_err(invalid)?
            }
            Self::MovementAudio => {
                entity.movement.audio_alert = parse_bool(value).map_err(invalid)?
            }
            Self::MovementRemote => {
                entity.movement.remote_alert = parse_bool(value).map_err(invalid)?
            }
            Self::MovementRemoteTarget => {
                entity.movement.remote_target_index = device_index(snapshot, value, invalid)?
            }
            Self::ProximityEnabled => {
                entity.proximity.enabled = parse_bool(value).map_err(invalid)?;
                if !entity.proximity.enabled {
                    entity.proximity_latched = false;
                }
            }
            Self::ProximityTarget => {
                entity.proximity.target_index = device_index(snapshot, value, invalid)?;
                entity.proximity_latched = false;
            }
            Self::ProximityDistance => {
                entity.proximity.threshold_meters = parse_distance(value).map_err(invalid)?
            }
            Self::ProximityAudio => {
                entity.proximity.audio_alert = parse_bool(value).map_err(invalid)?
            }
            Self::ProximityRemote => {
                entity.proximity.remote_alert = parse_bool(value).map_err(invalid)?
            }
            Self::ProximityRemoteTarget => {
                entity.proximity.remote_target_index = device_index(snapshot, value, invalid)?
            }
        }
        Ok(())
    }

    /// Check the value's syntax without touching an entity.
    pub fn validate(&self, value: &str) -> Result<(), ConfigError> {
        self.specification()
            .is_satisfied_by(value)
            .map_err(|reason| ConfigError::InvalidValue {
                key: self.name().to_string(),
                reason,
            })
    }

    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            Self::MovementEnabled
            | Self::MovementAudio
            | Self::MovementRemote
            | Self::ProximityEnabled
            | Self::ProximityAudio
            | Self::ProximityRemote => Box::new(BooleanSpec),
            Self::MovementTolerance | Self::ProximityDistance => Box::new(DistanceSpec),
            Self::MovementRemoteTarget | Self::ProximityTarget | Self::ProximityRemoteTarget => {
                Box::new(OptionalIndexSpec)
            }
        }
    }

    pub fn all() -> &'static [EntityConfigKey] {
        &[
            Self::MovementEnabled,
            Self::MovementTolerance,
            Self::MovementAudio,
            Self::MovementRemote,
            Self::MovementRemoteTarget,
            Self::ProximityEnabled,
            Self::ProximityTarget,
            Self::ProximityDistance,
            Self::ProximityAudio,
            Self::ProximityRemote,
            Self::ProximityRemoteTarget,
        ]
    }
}

fn device_index(
    snapshot: &RosterSnapshot,
    value: &str,
    invalid: impl Fn(String) -> ConfigError,
) -> Result<Option<usize>, ConfigError> {
    let index = parse_optional_index(value).map_err(invalid)?;
    if let Some(i) = index {
        snapshot.check_device_index(i)?;
    }
    Ok(index)
}

/// Every enabled flag must have a device target inside the snapshot.
fn check_targets(entity: &TrackedEntity, snapshot: &RosterSnapshot) -> Result<(), ConfigError> {
    let m = entity.movement();
    let p = entity.proximity();
    let required = [
        (
            m.remote_alert,
            m.remote_target_index,
            EntityConfigKey::MovementRemote,
            EntityConfigKey::MovementRemoteTarget,
        ),
        (
            p.enabled,
            p.target_index,
            EntityConfigKey::ProximityEnabled,
            EntityConfigKey::ProximityTarget,
        ),
        (
            p.remote_alert,
            p.remote_target_index,
            EntityConfigKey::ProximityRemote,
            EntityConfigKey::ProximityRemoteTarget,
        ),
    ];

    for (enabled, index, flag, target) in required {
        if !enabled {
            continue;
        }
        match index {
            Some(i) => snapshot.check_device_index(i)?,
            None => {
                return Err(ConfigError::TargetRequired {
                    flag: flag.name(),
                    target: target.name(),
                })
            }
        }
    }
    Ok(())
}

fn index_to_string(index: Option<usize>) -> String {
    index.map(|i| i.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::entity::{EntityId, EntityKind};
    use crate::tracking::roster::RosterEntry;

    fn snapshot() -> RosterSnapshot {
        RosterSnapshot::new(
            vec![RosterEntry::person("p-1", "Alice", "Smith")],
            vec![
                RosterEntry::device("d-1", "Phone", "iPhone"),
                RosterEntry::device("d-2", "iPad", "iPad Air"),
            ],
        )
    }

    fn entity() -> TrackedEntity {
        TrackedEntity::new(
            EntityId(1),
            RosterEntry::new(EntityKind::Person, "p-1", "Alice Smith"),
        )
    }

    #[test]
    fn test_key_round_trip_names() {
        for key in EntityConfigKey::all() {
            assert_eq!(key.name().parse::<EntityConfigKey>().unwrap(), *key);
            assert_eq!(key.legacy_name().parse::<EntityConfigKey>().unwrap(), *key);
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            "movement.speed".parse::<EntityConfigKey>(),
            Err(ConfigError::UnknownKey("movement.speed".to_string()))
        );
    }

    #[test]
    fn test_set_booleans_and_distances() {
        let s = snapshot();
        let mut e = entity();

        EntityConfigKey::MovementEnabled.set(&mut e, &s, "on").unwrap();
        EntityConfigKey::MovementTolerance.set(&mut e, &s, "750").unwrap();
        EntityConfigKey::ProximityDistance.set(&mut e, &s, "12.5").unwrap();

        assert!(e.movement().enabled);
        assert_eq!(e.movement().tolerance_meters, 750.0);
        assert_eq!(e.proximity().threshold_meters, 12.5);
        assert_eq!(EntityConfigKey::MovementTolerance.get(&e), "750");
    }

    #[test]
    fn test_invalid_values_leave_entity_unchanged() {
        let s = snapshot();
        let mut e = entity();

        let err = EntityConfigKey::MovementTolerance
            .set(&mut e, &s, "-5")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "movement.tolerance"
        ));

        assert!(EntityConfigKey::MovementAudio.set(&mut e, &s, "loud").is_err());
        assert_eq!(e.movement().tolerance_meters, 500.0);
        assert!(!e.movement().audio_alert);
    }

    #[test]
    fn test_target_index_validated_against_devices() {
        let s = snapshot();
        let mut e = entity();

        EntityConfigKey::ProximityTarget.set(&mut e, &s, "1").unwrap();
        assert_eq!(e.proximity().target_index, Some(1));

        let err = EntityConfigKey::ProximityTarget
            .set(&mut e, &s, "2")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::TargetOutOfRange {
                index: 2,
                available: 2
            }
        );
        assert_eq!(e.proximity().target_index, Some(1));

        let err = EntityConfigKey::MovementRemoteTarget
            .set(&mut e, &s, "7")
            .unwrap_err();
        assert!(matches!(err, ConfigError::TargetOutOfRange { index: 7, .. }));
    }

    #[test]
    fn test_empty_target_clears() {
        let s = snapshot();
        let mut e = entity();

        EntityConfigKey::ProximityRemoteTarget.set(&mut e, &s, "0").unwrap();
        assert_eq!(EntityConfigKey::ProximityRemoteTarget.get(&e), "0");

        EntityConfigKey::ProximityRemoteTarget.set(&mut e, &s, "").unwrap();
        assert_eq!(e.proximity().remote_target_index, None);
        assert_eq!(EntityConfigKey::ProximityRemoteTarget.get(&e), "");
    }

    #[test]
    fn test_enabling_without_target_is_rejected() {
        let s = snapshot();
        let mut e = entity();

        let err = EntityConfigKey::ProximityEnabled
            .set(&mut e, &s, "true")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::TargetRequired {
                flag: "proximity.enabled",
                target: "proximity.target",
            }
        );
        assert!(!e.proximity().enabled);

        let err = EntityConfigKey::MovementRemote
            .set(&mut e, &s, "true")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TargetRequired { target, .. } if target == "movement.remote_target"
        ));
        assert!(!e.movement().remote_alert);
    }

    #[test]
    fn test_clearing_target_of_enabled_flag_is_rejected() {
        let s = snapshot();
        let mut e = entity();
        EntityConfigKey::ProximityRemoteTarget.set(&mut e, &s, "1").unwrap();
        EntityConfigKey::ProximityRemote.set(&mut e, &s, "true").unwrap();

        let err = EntityConfigKey::ProximityRemoteTarget
            .set(&mut e, &s, "")
            .unwrap_err();
        assert!(matches!(err, ConfigError::TargetRequired { .. }));
        assert_eq!(e.proximity().remote_target_index, Some(1));

        EntityConfigKey::ProximityRemote.set(&mut e, &s, "false").unwrap();
        EntityConfigKey::ProximityRemoteTarget.set(&mut e, &s, "").unwrap();
        assert_eq!(e.proximity().remote_target_index, None);
    }

    #[test]
    fn test_changing_proximity_target_resets_latch() {
        let s = snapshot();
        let mut e = entity();
        e.proximity_latched = true;

        EntityConfigKey::ProximityTarget.set(&mut e, &s, "0").unwrap();
        assert!(!e.proximity_latched());
    }

    #[test]
    fn test_legacy_alias_sets_same_field() {
        let s = snapshot();
        let mut e = entity();

        let key: EntityConfigKey = "watch_proximity_audio".parse().unwrap();
        key.set(&mut e, &s, "true").unwrap();
        assert!(e.proximity().audio_alert);
    }
}
