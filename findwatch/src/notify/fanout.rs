//! Sink that forwards to several sinks.

use std::sync::Arc;

use super::NotificationSink;
use crate::tracking::RosterEntry;

/// Forwards every notification to each inner sink in order.
#[derive(Clone, Default)]
pub struct FanoutNotifier {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink (builder style).
    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn push(&mut self, sink: Arc<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl std::fmt::Debug for FanoutNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutNotifier")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl NotificationSink for FanoutNotifier {
    fn announce_audio(&self, text: &str) {
        for sink in &self.sinks {
            sink.announce_audio(text);
        }
    }

    fn show_banner(&self, title: &str, text: &str) {
        for sink in &self.sinks {
            sink.show_banner(title, text);
        }
    }

    fn alert_remote_device(&self, device: &RosterEntry, message: &str) {
        for sink in &self.sinks {
            sink.alert_remote_device(device, message);
        }
    }
}
