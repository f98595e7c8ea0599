//! Configuration for findwatch.
//!
//! User settings live in `~/.findwatch/config.ini`:
//!
//! ```ini
//! [schedule]
//! startup_delay = 10
//! interval = 120
//!
//! [detection]
//! default_tolerance = 500
//! proximity_debounce = every_cycle
//!
//! [watch.1]
//! kind = person
//! reference = p-1
//! movement.enabled = true
//! ```
//!
//! Settings structs live in `settings`, constants in `defaults`, parsing in
//! `parser`, serialization in `writer`, and per-key access in `keys`.

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
pub(crate) mod spec;
mod watch;
mod writer;

pub use defaults::{DEFAULT_LOG_FILE_NAME, DEFAULT_SNAPSHOT_FILE_NAME, DEFAULT_TICK_MILLIS};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    ConfigFile, DetectionSettings, LoggingSettings, NotificationSettings, ProviderSettings,
    ScheduleSettings, WatchEntry,
};
pub use watch::install_watches;
