//! Sink that writes notifications to the tracing log.

use super::NotificationSink;
use crate::tracking::RosterEntry;

/// Logs every notification at `info`.
///
/// The CLI pairs this with [`CommandNotifier`](super::CommandNotifier) so
/// alerts always show up in the log file even when no command is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingNotifier {
    fn announce_audio(&self, text: &str) {
        tracing::info!(channel = "audio", text, "Notification");
    }

    fn show_banner(&self, title: &str, text: &str) {
        tracing::info!(channel = "banner", title, text, "Notification");
    }

    fn alert_remote_device(&self, device: &RosterEntry, message: &str) {
        tracing::info!(
            channel = "remote",
            device = %device.display_name,
            device_id = %device.reference,
            message,
            "Notification"
        );
    }
}
