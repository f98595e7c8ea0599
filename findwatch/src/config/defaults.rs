//! Default values and constants for all configuration settings.

use super::file::config_directory;
use super::settings::*;
use crate::notify::CommandTemplates;
use crate::tracking::{
    DuplicatePolicy, ProximityDebounce, DEFAULT_STARTUP_DELAY, DEFAULT_STEADY_INTERVAL,
    DEFAULT_THRESHOLD_METERS, DEFAULT_TOLERANCE_METERS,
};

/// Default tick length in milliseconds.
pub const DEFAULT_TICK_MILLIS: u64 = 1000;

/// Default snapshot file name inside the config directory.
pub const DEFAULT_SNAPSHOT_FILE_NAME: &str = "snapshot.json";

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "findwatch.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let templates = CommandTemplates::default();
        Self {
            schedule: ScheduleSettings {
                startup_delay: DEFAULT_STARTUP_DELAY,
                interval: DEFAULT_STEADY_INTERVAL,
                tick_millis: DEFAULT_TICK_MILLIS,
            },
            detection: DetectionSettings {
                default_tolerance: DEFAULT_TOLERANCE_METERS,
                default_distance: DEFAULT_THRESHOLD_METERS,
                proximity_debounce: ProximityDebounce::default(),
                duplicates: DuplicatePolicy::default(),
            },
            provider: ProviderSettings {
                snapshot_file: config_directory().join(DEFAULT_SNAPSHOT_FILE_NAME),
            },
            notifications: NotificationSettings {
                audio_command: templates.audio,
                banner_command: templates.banner,
                remote_command: templates.remote,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
            watches: Vec::new(),
        }
    }
}
