//! Sink that remembers what it was asked to deliver.

use std::sync::Mutex;

use super::NotificationSink;
use crate::tracking::{EntityRef, RosterEntry};

/// A delivered notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Audio(String),
    Banner { title: String, text: String },
    Remote { device: EntityRef, message: String },
}

/// Keeps every notification in memory.
///
/// Handy for dry runs and for asserting on alerts in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Banners delivered so far as `(title, text)`.
    pub fn banners(&self) -> Vec<(String, String)> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Banner { title, text } => Some((title.clone(), text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Spoken texts delivered so far.
    pub fn audio(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Audio(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Remote alerts delivered so far as `(device, message)`.
    pub fn remote(&self) -> Vec<(EntityRef, String)> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Remote { device, message } => {
                    Some((device.clone(), message.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationSink for RecordingNotifier {
    fn announce_audio(&self, text: &str) {
        self.lock().push(Notification::Audio(text.to_string()));
    }

    fn show_banner(&self, title: &str, text: &str) {
        self.lock().push(Notification::Banner {
            title: title.to_string(),
            text: text.to_string(),
        });
    }

    fn alert_remote_device(&self, device: &RosterEntry, message: &str) {
        self.lock().push(Notification::Remote {
            device: device.reference.clone(),
            message: message.to_string(),
        });
    }
}
