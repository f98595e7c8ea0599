//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::notify::CommandTemplates;
use crate::tracking::{
    DuplicatePolicy, EntityConfigKey, EntityKind, EntityRef, ProximityDebounce, RosterOptions,
    ScheduleConfig,
};

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Polling cadence
    pub schedule: ScheduleSettings,
    /// Detection defaults and policies
    pub detection: DetectionSettings,
    /// Location source
    pub provider: ProviderSettings,
    /// Notification commands
    pub notifications: NotificationSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Entities to track at startup, from `[watch.N]` sections
    pub watches: Vec<WatchEntry>,
}

/// Polling cadence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSettings {
    /// Ticks before the first cycle.
    pub startup_delay: u32,
    /// Ticks between cycles.
    pub interval: u32,
    /// Tick length in milliseconds.
    pub tick_millis: u64,
}

/// Detection defaults and policies.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionSettings {
    /// Movement tolerance given to newly tracked entities (meters).
    pub default_tolerance: f64,
    /// Proximity threshold given to newly tracked entities (meters).
    pub default_distance: f64,
    pub proximity_debounce: ProximityDebounce,
    pub duplicates: DuplicatePolicy,
}

/// Location source.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// JSON snapshot written by the account bridge.
    pub snapshot_file: PathBuf,
}

/// Notification command templates. Empty disables a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationSettings {
    pub audio_command: String,
    pub banner_command: String,
    pub remote_command: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

/// One entity to track at startup with its settings.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEntry {
    pub kind: EntityKind,
    pub reference: EntityRef,
    /// Settings applied in order after tracking starts.
    pub settings: Vec<(EntityConfigKey, String)>,
}

impl ConfigFile {
    pub fn schedule_config(&self) -> ScheduleConfig {
        ScheduleConfig {
            startup_delay: self.schedule.startup_delay,
            steady_interval: self.schedule.interval,
            tick: std::time::Duration::from_millis(self.schedule.tick_millis),
        }
    }

    pub fn roster_options(&self) -> RosterOptions {
        RosterOptions {
            duplicates: self.detection.duplicates,
            default_tolerance_meters: self.detection.default_tolerance,
            default_threshold_meters: self.detection.default_distance,
        }
    }

    pub fn command_templates(&self) -> CommandTemplates {
        CommandTemplates {
            audio: self.notifications.audio_command.clone(),
            banner: self.notifications.banner_command.clone(),
            remote: self.notifications.remote_command.clone(),
        }
    }
}
