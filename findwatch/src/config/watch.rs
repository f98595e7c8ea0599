//! Installing the configured watch list into a running engine.

use super::settings::WatchEntry;
use crate::notify::NotificationSink;
use crate::provider::LocationProvider;
use crate::tracking::{ConfigError, DetectionEngine, EntityId};

impl WatchEntry {
    /// Track this entry and apply its settings.
    ///
    /// If any setting is rejected the entity is untracked again, so a
    /// half-configured watch never runs.
    pub fn install<P, N>(
        &self,
        engine: &mut DetectionEngine<P, N>,
    ) -> Result<EntityId, ConfigError>
    where
        P: LocationProvider,
        N: NotificationSink,
    {
        let id = engine.track_reference(self.kind, &self.reference)?;
        for (key, value) in &self.settings {
            if let Err(e) = engine.set(id, key.name(), value) {
                // The id was just issued, so untracking cannot fail.
                let _ = engine.untrack(id);
                return Err(e);
            }
        }
        Ok(id)
    }
}

/// Install every watch entry, logging the ones that fail.
///
/// Returns the ids of the installed entities in watch list order.
pub fn install_watches<P, N>(
    engine: &mut DetectionEngine<P, N>,
    watches: &[WatchEntry],
) -> Vec<EntityId>
where
    P: LocationProvider,
    N: NotificationSink,
{
    let mut installed = Vec::with_capacity(watches.len());
    for watch in watches {
        match watch.install(engine) {
            Ok(id) => {
                tracing::info!(
                    id = %id,
                    kind = %watch.kind,
                    reference = %watch.reference,
                    "Watch installed"
                );
                installed.push(id);
            }
            Err(e) => {
                tracing::warn!(
                    kind = %watch.kind,
                    reference = %watch.reference,
                    error = %e,
                    "Watch skipped"
                );
            }
        }
    }
    installed
}
