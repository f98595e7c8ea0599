//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by key name, with validation via the Specification Pattern.

use std::str::FromStr;
use thiserror::Error;

use super::file::{expand_tilde, path_to_display, ConfigFile};
use super::spec::{
    parse_distance, AnyStringSpec, DistanceSpec, OneOfSpec, PathSpec, PositiveIntegerSpec,
    ValueSpecification,
};

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`] and knows how to
/// get and set its value with proper validation. Watch list sections are
/// edited through the file, not through keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Schedule settings
    ScheduleStartupDelay,
    ScheduleInterval,
    ScheduleTickMillis,

    // Detection settings
    DetectionDefaultTolerance,
    DetectionDefaultDistance,
    DetectionProximityDebounce,
    DetectionDuplicates,

    // Provider settings
    ProviderSnapshotFile,

    // Notification settings
    NotificationsAudioCommand,
    NotificationsBannerCommand,
    NotificationsRemoteCommand,

    // Logging settings
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s.to_lowercase())
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "schedule.interval").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ScheduleStartupDelay => "schedule.startup_delay",
            ConfigKey::ScheduleInterval => "schedule.interval",
            ConfigKey::ScheduleTickMillis => "schedule.tick_millis",
            ConfigKey::DetectionDefaultTolerance => "detection.default_tolerance",
            ConfigKey::DetectionDefaultDistance => "detection.default_distance",
            ConfigKey::DetectionProximityDebounce => "detection.proximity_debounce",
            ConfigKey::DetectionDuplicates => "detection.duplicates",
            ConfigKey::ProviderSnapshotFile => "provider.snapshot_file",
            ConfigKey::NotificationsAudioCommand => "notifications.audio_command",
            ConfigKey::NotificationsBannerCommand => "notifications.banner_command",
            ConfigKey::NotificationsRemoteCommand => "notifications.remote_command",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "schedule").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "interval").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ScheduleStartupDelay => config.schedule.startup_delay.to_string(),
            ConfigKey::ScheduleInterval => config.schedule.interval.to_string(),
            ConfigKey::ScheduleTickMillis => config.schedule.tick_millis.to_string(),
            ConfigKey::DetectionDefaultTolerance => config.detection.default_tolerance.to_string(),
            ConfigKey::DetectionDefaultDistance => config.detection.default_distance.to_string(),
            ConfigKey::DetectionProximityDebounce => {
                config.detection.proximity_debounce.as_str().to_string()
            }
            ConfigKey::DetectionDuplicates => config.detection.duplicates.as_str().to_string(),
            ConfigKey::ProviderSnapshotFile => path_to_display(&config.provider.snapshot_file),
            ConfigKey::NotificationsAudioCommand => config.notifications.audio_command.clone(),
            ConfigKey::NotificationsBannerCommand => config.notifications.banner_command.clone(),
            ConfigKey::NotificationsRemoteCommand => config.notifications.remote_command.clone(),
            ConfigKey::LoggingFile => path_to_display(&config.logging.file),
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value according to the key's specification before setting.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        let invalid = |reason: String| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason,
        };
        let value = value.trim();

        match self {
            ConfigKey::ScheduleStartupDelay => {
                config.schedule.startup_delay =
                    value.parse().map_err(|e| invalid(format!("{}", e)))?;
            }
            ConfigKey::ScheduleInterval => {
                config.schedule.interval = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            }
            ConfigKey::ScheduleTickMillis => {
                config.schedule.tick_millis = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            }
            ConfigKey::DetectionDefaultTolerance => {
                config.detection.default_tolerance = parse_distance(value).map_err(invalid)?;
            }
            ConfigKey::DetectionDefaultDistance => {
                config.detection.default_distance = parse_distance(value).map_err(invalid)?;
            }
            ConfigKey::DetectionProximityDebounce => {
                config.detection.proximity_debounce = value.parse().map_err(invalid)?;
            }
            ConfigKey::DetectionDuplicates => {
                config.detection.duplicates = value.parse().map_err(invalid)?;
            }
            ConfigKey::ProviderSnapshotFile => {
                config.provider.snapshot_file = expand_tilde(value);
            }
            ConfigKey::NotificationsAudioCommand => {
                config.notifications.audio_command = value.to_string();
            }
            ConfigKey::NotificationsBannerCommand => {
                config.notifications.banner_command = value.to_string();
            }
            ConfigKey::NotificationsRemoteCommand => {
                config.notifications.remote_command = value.to_string();
            }
            ConfigKey::LoggingFile => {
                config.logging.file = expand_tilde(value);
            }
        }
        Ok(())
    }

    /// Validate a value according to this key's specification.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value)
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    /// Get the validation specification for this key.
    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::ScheduleStartupDelay
            | ConfigKey::ScheduleInterval
            | ConfigKey::ScheduleTickMillis => Box::new(PositiveIntegerSpec),
            ConfigKey::DetectionDefaultTolerance | ConfigKey::DetectionDefaultDistance => {
                Box::new(DistanceSpec)
            }
            ConfigKey::DetectionProximityDebounce => {
                Box::new(OneOfSpec::new(&["every_cycle", "on_entry"]))
            }
            ConfigKey::DetectionDuplicates => Box::new(OneOfSpec::new(&["allow", "reject"])),
            ConfigKey::ProviderSnapshotFile | ConfigKey::LoggingFile => Box::new(PathSpec),
            ConfigKey::NotificationsAudioCommand
            | ConfigKey::NotificationsBannerCommand
            | ConfigKey::NotificationsRemoteCommand => Box::new(AnyStringSpec),
        }
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ScheduleStartupDelay,
            ConfigKey::ScheduleInterval,
            ConfigKey::ScheduleTickMillis,
            ConfigKey::DetectionDefaultTolerance,
            ConfigKey::DetectionDefaultDistance,
            ConfigKey::DetectionProximityDebounce,
            ConfigKey::DetectionDuplicates,
            ConfigKey::ProviderSnapshotFile,
            ConfigKey::NotificationsAudioCommand,
            ConfigKey::NotificationsBannerCommand,
            ConfigKey::NotificationsRemoteCommand,
            ConfigKey::LoggingFile,
        ]
    }
}
