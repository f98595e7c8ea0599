//! Notification sinks.
//!
//! Detection events leave the engine through a [`NotificationSink`]. There
//! are three channels:
//!
//! - audio: spoken text
//! - banner: a desktop notification with a title
//! - remote: an alert shown on another device from the roster
//!
//! Delivery is fire-and-forget. Sinks log failures and never report them
//! back, so a broken speaker cannot stall a detection cycle.

mod command;
mod error;
mod fanout;
mod noop;
mod recording;
mod tracing_sink;

pub use command::{
    CommandNotifier, CommandTemplates, DEFAULT_COMMAND_TIMEOUT, DEFAULT_MAX_RUNNING,
};
pub use error::NotifyError;
pub use fanout::FanoutNotifier;
pub use noop::NoOpNotifier;
pub use recording::{Notification, RecordingNotifier};
pub use tracing_sink::TracingNotifier;

use std::sync::Arc;

use crate::tracking::RosterEntry;

/// Destination for detection alerts.
pub trait NotificationSink: Send + Sync {
    /// Speak `text` aloud.
    fn announce_audio(&self, text: &str);

    /// Show a desktop banner.
    fn show_banner(&self, title: &str, text: &str);

    /// Show `message` on a device from the roster.
    fn alert_remote_device(&self, device: &RosterEntry, message: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn announce_audio(&self, text: &str) {
        (**self).announce_audio(text)
    }

    fn show_banner(&self, title: &str, text: &str) {
        (**self).show_banner(title, text)
    }

    fn alert_remote_device(&self, device: &RosterEntry, message: &str) {
        (**self).alert_remote_device(device, message)
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Box<T> {
    fn announce_audio(&self, text: &str) {
        (**self).announce_audio(text)
    }

    fn show_banner(&self, title: &str, text: &str) {
        (**self).show_banner(title, text)
    }

    fn alert_remote_device(&self, device: &RosterEntry, message: &str) {
        (**self).alert_remote_device(device, message)
    }
}
