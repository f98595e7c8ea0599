//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::fmt::Write;

use super::file::path_to_display;
use super::parser::WATCH_SECTION_PREFIX;
use super::settings::{ConfigFile, WatchEntry};

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let mut out = format!(
        r#"[schedule]
; Seconds (ticks) before the first detection cycle after startup (default: 10)
startup_delay = {}
; Seconds (ticks) between detection cycles (default: 120)
interval = {}
; Length of one tick in milliseconds (default: 1000)
tick_millis = {}

[detection]
; Movement tolerance in meters given to newly tracked entities (default: 500)
default_tolerance = {}
; Proximity distance in meters given to newly tracked entities (default: 500)
default_distance = {}
; How repeated proximity is reported:
;   every_cycle - alert on every cycle the entity is in range
;   on_entry    - alert once when entering range, again after leaving it
proximity_debounce = {}
; Tracking the same person or device twice:
;   allow  - each instance keeps its own settings and state
;   reject - refuse to add it again
duplicates = {}

[provider]
; JSON snapshot of persons and devices written by the account bridge
snapshot_file = {}

[notifications]
; Commands run for each alert. Placeholders expand to a single argument.
; Leave a command empty to disable that channel.
;   audio:  {{text}}
;   banner: {{title}} {{text}} {{applescript}}
;   remote: {{device_id}} {{device}} {{message}}
audio_command = {}
banner_command = {}
remote_command = {}

[logging]
; Log file, truncated at every start
file = {}
"#,
        config.schedule.startup_delay,
        config.schedule.interval,
        config.schedule.tick_millis,
        config.detection.default_tolerance,
        config.detection.default_distance,
        config.detection.proximity_debounce.as_str(),
        config.detection.duplicates.as_str(),
        path_to_display(&config.provider.snapshot_file),
        config.notifications.audio_command,
        config.notifications.banner_command,
        config.notifications.remote_command,
        path_to_display(&config.logging.file),
    );

    if !config.watches.is_empty() {
        out.push_str("\n; Entities tracked at startup\n");
    }
    for (i, watch) in config.watches.iter().enumerate() {
        write_watch(&mut out, i + 1, watch);
    }

    out
}

fn write_watch(out: &mut String, number: usize, watch: &WatchEntry) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "\n[{}{}]", WATCH_SECTION_PREFIX, number);
    let _ = writeln!(out, "kind = {}", watch.kind);
    let _ = writeln!(out, "reference = {}", watch.reference);
    for (key, value) in &watch.settings {
        let _ = writeln!(out, "{} = {}", key.name(), value);
    }
}
