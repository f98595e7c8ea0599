//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};

use super::file::{expand_tilde, ConfigFileError};
use super::settings::{ConfigFile, WatchEntry};
use super::spec::{parse_distance, PositiveIntegerSpec, ValueSpecification};
use crate::tracking::{EntityConfigKey, EntityKind, EntityRef};

/// Prefix of watch list section names (`[watch.1]`, `[watch.2]`, ...).
pub(super) const WATCH_SECTION_PREFIX: &str = "watch.";

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [schedule] section
    if let Some(section) = ini.section(Some("schedule")) {
        if let Some(v) = section.get("startup_delay") {
            config.schedule.startup_delay = parse_positive(v, "schedule", "startup_delay")?;
        }
        if let Some(v) = section.get("interval") {
            config.schedule.interval = parse_positive(v, "schedule", "interval")?;
        }
        if let Some(v) = section.get("tick_millis") {
            config.schedule.tick_millis = parse_positive(v, "schedule", "tick_millis")?;
        }
    }

    // [detection] section
    if let Some(section) = ini.section(Some("detection")) {
        if let Some(v) = section.get("default_tolerance") {
            config.detection.default_tolerance = parse_distance(v)
                .map_err(|reason| invalid("detection", "default_tolerance", v, reason))?;
        }
        if let Some(v) = section.get("default_distance") {
            config.detection.default_distance = parse_distance(v)
                .map_err(|reason| invalid("detection", "default_distance", v, reason))?;
        }
        if let Some(v) = section.get("proximity_debounce") {
            config.detection.proximity_debounce = v.parse().map_err(|_| {
                invalid(
                    "detection",
                    "proximity_debounce",
                    v,
                    "must be one of: every_cycle, on_entry".to_string(),
                )
            })?;
        }
        if let Some(v) = section.get("duplicates") {
            config.detection.duplicates = v.parse().map_err(|_| {
                invalid(
                    "detection",
                    "duplicates",
                    v,
                    "must be one of: allow, reject".to_string(),
                )
            })?;
        }
    }

    // [provider] section
    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = section.get("snapshot_file") {
            let v = v.trim();
            if !v.is_empty() {
                config.provider.snapshot_file = expand_tilde(v);
            }
        }
    }

    // [notifications] section
    if let Some(section) = ini.section(Some("notifications")) {
        if let Some(v) = section.get("audio_command") {
            config.notifications.audio_command = v.trim().to_string();
        }
        if let Some(v) = section.get("banner_command") {
            config.notifications.banner_command = v.trim().to_string();
        }
        if let Some(v) = section.get("remote_command") {
            config.notifications.remote_command = v.trim().to_string();
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    // [watch.N] sections, in file order
    for (name, section) in ini.iter() {
        if let Some(name) = name {
            if name.starts_with(WATCH_SECTION_PREFIX) {
                config.watches.push(parse_watch(name, section)?);
            }
        }
    }

    Ok(config)
}

fn parse_watch(name: &str, section: &Properties) -> Result<WatchEntry, ConfigFileError> {
    let kind_value = section
        .get("kind")
        .ok_or_else(|| invalid(name, "kind", "", "is required".to_string()))?;
    let kind: EntityKind = kind_value
        .parse()
        .map_err(|reason| invalid(name, "kind", kind_value, reason))?;

    let reference = section
        .get("reference")
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| invalid(name, "reference", "", "is required".to_string()))?;

    let mut settings = Vec::new();
    for (key, value) in section.iter() {
        if key == "kind" || key == "reference" {
            continue;
        }
        let parsed: EntityConfigKey = key
            .parse()
            .map_err(|_| invalid(name, key, value, "unknown entity setting".to_string()))?;
        parsed
            .validate(value)
            .map_err(|e| invalid(name, key, value, e.to_string()))?;
        settings.push((parsed, value.trim().to_string()));
    }

    Ok(WatchEntry {
        kind,
        reference: EntityRef::new(reference),
        settings,
    })
}

fn parse_positive<T: std::str::FromStr>(
    value: &str,
    section: &str,
    key: &str,
) -> Result<T, ConfigFileError> {
    PositiveIntegerSpec
        .is_satisfied_by(value)
        .map_err(|reason| invalid(section, key, value, reason))?;
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "value is too large".to_string()))
}

fn invalid(section: &str, key: &str, value: &str, reason: String) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}
