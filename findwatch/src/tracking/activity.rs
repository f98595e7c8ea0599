//! Per-entity activity log.
//!
//! Every fix, detection and fetch error for an entity is appended here with
//! a local timestamp. The log is owned by the entity and only written by the
//! detection engine.

use chrono::{DateTime, Local};

/// Timestamp format used when rendering the log as text.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single timestamped log line.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    /// When the entry was recorded.
    pub at: DateTime<Local>,
    /// Message text.
    pub message: String,
}

/// Append-only, ordered activity log.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current local time.
    pub fn record(&mut self, message: impl Into<String>) {
        self.record_at(Local::now(), message);
    }

    /// Append a message with an explicit timestamp.
    pub fn record_at(&mut self, at: DateTime<Local>, message: impl Into<String>) {
        self.entries.push(ActivityEntry {
            at,
            message: message.into(),
        });
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    /// Most recent entry, if any.
    pub fn last(&self) -> Option<&ActivityEntry> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries whose message contains `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.message.contains(needle))
            .count()
    }

    /// Render the log as display text, one line per entry.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.at.format(TIMESTAMP_FORMAT).to_string());
            text.push_str("  ");
            text.push_str(&entry.message);
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_log_is_empty() {
        let log = ActivityLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.last().is_none());
        assert_eq!(log.to_text(), "");
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut log = ActivityLog::new();
        log.record("first");
        log.record("second");
        log.record("third");

        let messages: Vec<&str> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(log.last().unwrap().message, "third");
    }

    #[test]
    fn test_to_text_format() {
        let mut log = ActivityLog::new();
        let at = Local.with_ymd_and_hms(2024, 5, 17, 9, 30, 5).unwrap();
        log.record_at(at, "Alice has moved.");

        assert_eq!(log.to_text(), "2024-05-17 09:30:05  Alice has moved.\n");
    }

    #[test]
    fn test_count_containing() {
        let mut log = ActivityLog::new();
        log.record("Error retrieving location");
        log.record("lat 1, lng 2");
        log.record("Error retrieving location");

        assert_eq!(log.count_containing("Error retrieving"), 2);
        assert_eq!(log.count_containing("moved"), 0);
    }
}
