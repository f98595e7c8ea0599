//! Sink that discards everything.

use super::NotificationSink;
use crate::tracking::RosterEntry;

/// A sink that discards all notifications.
///
/// Used when alerts should only land in the activity log, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl NotificationSink for NoOpNotifier {
    #[inline]
    fn announce_audio(&self, _text: &str) {}

    #[inline]
    fn show_banner(&self, _title: &str, _text: &str) {}

    #[inline]
    fn alert_remote_device(&self, _device: &RosterEntry, _message: &str) {}
}
