//! Detection engine.
//!
//! One call to [`DetectionEngine::run_cycle`] walks every tracked entity in
//! display order:
//!
//! 1. fetch its current location
//! 2. compare against the movement baseline (if watched)
//! 3. compare against the reference device (if proximity is watched)
//! 4. raise alerts through the [`NotificationSink`]
//!
//! Everything that happens lands in the entity's activity log. A failed
//! lookup only affects the entity it belongs to; the cycle moves on.

use std::sync::Arc;

use super::entity::{EntityId, EntityKind, EntityRef, MovementState, TrackedEntity};
use super::error::ConfigError;
use super::policy::{
    evaluate_movement, evaluate_proximity, MovementDecision, ProximityDebounce, ProximityDecision,
};
use super::roster::{RosterEntry, RosterOptions, RosterSnapshot, TrackingRoster};
use crate::coord::distance_meters;
use crate::notify::NotificationSink;
use crate::provider::{LocationError, LocationProvider};

/// Spoken and logged when a location lookup fails.
pub const FETCH_ERROR_TEXT: &str = "Error retrieving location";

/// Banner title for movement alerts.
pub const MOVEMENT_TITLE: &str = "Movement Detected";

/// Banner title for proximity alerts.
pub const PROXIMITY_TITLE: &str = "Proximity Detected";

/// What happened to one entity during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOutcome {
    pub entity: EntityId,
    /// The entity's own location could not be fetched.
    pub fetch_failed: bool,
    /// A movement alert was raised.
    pub moved: bool,
    /// A proximity alert was raised.
    pub proximity: bool,
}

impl EntityOutcome {
    fn new(entity: EntityId) -> Self {
        Self {
            entity,
            fetch_failed: false,
            moved: false,
            proximity: false,
        }
    }
}

/// Summary of one detection cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    pub outcomes: Vec<EntityOutcome>,
}

impl CycleReport {
    /// Number of alerts raised (movement + proximity).
    pub fn events(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| o.moved as usize + o.proximity as usize)
            .sum()
    }

    /// Number of entities whose location could not be fetched.
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.fetch_failed).count()
    }

    pub fn outcome(&self, id: EntityId) -> Option<&EntityOutcome> {
        self.outcomes.iter().find(|o| o.entity == id)
    }
}

/// An alert about to be delivered.
struct Alert {
    title: &'static str,
    message: String,
    audio: bool,
    remote: bool,
    remote_target: Option<usize>,
}

/// Owns the tracked entities and evaluates them against fresh fixes.
pub struct DetectionEngine<P, N> {
    provider: P,
    notifier: N,
    roster: TrackingRoster,
    debounce: ProximityDebounce,
    cycles_run: u64,
}

impl<P, N> DetectionEngine<P, N>
where
    P: LocationProvider,
    N: NotificationSink,
{
    /// Create an engine over an existing roster.
    pub fn new(provider: P, notifier: N, roster: TrackingRoster) -> Self {
        Self {
            provider,
            notifier,
            roster,
            debounce: ProximityDebounce::default(),
            cycles_run: 0,
        }
    }

    /// Fetch the session roster from the provider and create an engine.
    pub async fn connect(
        provider: P,
        notifier: N,
        options: RosterOptions,
    ) -> Result<Self, LocationError> {
        let snapshot = provider.roster().await?;
        tracing::info!(
            persons = snapshot.persons.len(),
            devices = snapshot.devices.len(),
            "Roster loaded"
        );
        Ok(Self::new(
            provider,
            notifier,
            TrackingRoster::with_options(snapshot, options),
        ))
    }

    pub fn with_debounce(mut self, debounce: ProximityDebounce) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn debounce(&self) -> ProximityDebounce {
        self.debounce
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn roster(&self) -> &TrackingRoster {
        &self.roster
    }

    pub fn snapshot(&self) -> &RosterSnapshot {
        self.roster.snapshot()
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    // ------------------------------------------------------------------
    // Configuration surface
    // ------------------------------------------------------------------

    /// Track the roster entry at a combined index (persons first).
    pub fn track(&mut self, index: usize) -> Result<EntityId, ConfigError> {
        self.roster.track(index)
    }

    /// Track a roster entry.
    pub fn track_entry(&mut self, entry: &RosterEntry) -> Result<EntityId, ConfigError> {
        self.roster.track_reference(entry.kind, &entry.reference)
    }

    /// Track by kind and upstream reference.
    pub fn track_reference(
        &mut self,
        kind: EntityKind,
        reference: &EntityRef,
    ) -> Result<EntityId, ConfigError> {
        self.roster.track_reference(kind, reference)
    }

    pub fn untrack(&mut self, id: EntityId) -> Result<(), ConfigError> {
        self.roster.untrack(id).map(|_| ())
    }

    pub fn set(&mut self, id: EntityId, key: &str, value: &str) -> Result<(), ConfigError> {
        self.roster.set(id, key, value)
    }

    pub fn get(&self, id: EntityId, key: &str) -> Result<String, ConfigError> {
        self.roster.get_value(id, key)
    }

    pub fn entity(&self, id: EntityId) -> Option<&TrackedEntity> {
        self.roster.get(id)
    }

    pub fn entities(&self) -> &[TrackedEntity] {
        self.roster.entities()
    }

    /// Activity log of one entity rendered for display.
    pub fn log_text(&self, id: EntityId) -> Result<String, ConfigError> {
        self.roster
            .get(id)
            .map(|e| e.log().to_text())
            .ok_or(ConfigError::UnknownEntity(id))
    }

    // ------------------------------------------------------------------
    // Detection
    // ------------------------------------------------------------------

    /// Evaluate every tracked entity once.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycles_run += 1;
        let mut report = CycleReport {
            cycle: self.cycles_run,
            outcomes: Vec::with_capacity(self.roster.len()),
        };

        for position in 0..self.roster.len() {
            if let Some(outcome) = self.evaluate_entity(position).await {
                report.outcomes.push(outcome);
            }
        }

        tracing::info!(
            cycle = report.cycle,
            entities = report.outcomes.len(),
            events = report.events(),
            failures = report.failures(),
            "Detection cycle complete"
        );

        report
    }

    async fn evaluate_entity(&mut self, position: usize) -> Option<EntityOutcome> {
        let snapshot = Arc::clone(self.roster.snapshot());
        let debounce = self.debounce;
        let entity = self.roster.entity_at_mut(position)?;
        let mut outcome = EntityOutcome::new(entity.id());

        let fix = match self
            .provider
            .current_location(entity.kind(), entity.reference())
            .await
        {
            Ok(fix) => fix,
            Err(e) => {
                tracing::warn!(
                    entity = %entity.display_name(),
                    error = %e,
                    "Error retrieving location"
                );
                entity.log.record(format!("{}: {}", FETCH_ERROR_TEXT, e));
                if entity.wants_audio() {
                    self.notifier.announce_audio(FETCH_ERROR_TEXT);
                }
                outcome.fetch_failed = true;
                return Some(outcome);
            }
        };

        tracing::debug!(
            entity = %entity.display_name(),
            latitude = fix.latitude,
            longitude = fix.longitude,
            "Location fix"
        );
        entity.log.record(fix.to_string());

        if entity.movement.enabled {
            let decision =
                evaluate_movement(&entity.baseline, fix, entity.movement.tolerance_meters);
            match decision {
                MovementDecision::Baseline => entity.log.record("Baseline set"),
                MovementDecision::Within { distance_m } => {
                    entity
                        .log
                        .record(format!("Delta distance (meters): {}", distance_m));
                }
                MovementDecision::Moved { distance_m } => {
                    entity
                        .log
                        .record(format!("Delta distance (meters): {}", distance_m));
                    tracing::info!(
                        entity = %entity.display_name(),
                        distance_m,
                        "Movement detected"
                    );

                    let alert = Alert {
                        title: MOVEMENT_TITLE,
                        message: format!("{} has moved.", entity.display_name()),
                        audio: entity.movement.audio_alert,
                        remote: entity.movement.remote_alert,
                        remote_target: entity.movement.remote_target_index,
                    };
                    dispatch(&self.notifier, &snapshot, entity, alert);
                    outcome.moved = true;
                }
            }
            entity.baseline = decision.next_state(entity.baseline, fix);
        } else {
            // Re-enabling compares against the latest poll, not a stale baseline.
            entity.baseline = MovementState::Armed(fix);
        }

        if entity.proximity.enabled {
            let target = entity
                .proximity
                .target_index
                .and_then(|index| snapshot.device(index));

            match target {
                None => {
                    tracing::debug!(
                        entity = %entity.display_name(),
                        "Proximity watch has no reference device"
                    );
                }
                Some(target) => {
                    match self
                        .provider
                        .current_location(target.kind, &target.reference)
                        .await
                    {
                        Err(e) => {
                            tracing::warn!(
                                entity = %entity.display_name(),
                                device = %target.display_name,
                                error = %e,
                                "Error retrieving reference device location"
                            );
                            entity.log.record(format!(
                                "{} of {}",
                                FETCH_ERROR_TEXT, target.display_name
                            ));
                        }
                        Ok(reference_fix) => {
                            let distance_m = distance_meters(fix, reference_fix);
                            entity.log.record(format!(
                                "Distance to {} (meters): {}",
                                target.display_name, distance_m
                            ));

                            let verdict = evaluate_proximity(
                                distance_m,
                                entity.proximity.threshold_meters,
                                debounce,
                                entity.proximity_latched,
                            );
                            entity.proximity_latched = verdict.latched;

                            match verdict.decision {
                                ProximityDecision::Near => {
                                    tracing::info!(
                                        entity = %entity.display_name(),
                                        device = %target.display_name,
                                        distance_m,
                                        "Proximity detected"
                                    );
                                    let alert = Alert {
                                        title: PROXIMITY_TITLE,
                                        message: format!(
                                            "{} is near {}",
                                            target.display_name,
                                            entity.display_name()
                                        ),
                                        audio: entity.proximity.audio_alert,
                                        remote: entity.proximity.remote_alert,
                                        remote_target: entity.proximity.remote_target_index,
                                    };
                                    dispatch(&self.notifier, &snapshot, entity, alert);
                                    outcome.proximity = true;
                                }
                                ProximityDecision::Suppressed => {
                                    tracing::debug!(
                                        entity = %entity.display_name(),
                                        "Proximity already reported"
                                    );
                                }
                                ProximityDecision::Far => {}
                            }
                        }
                    }
                }
            }
        }

        Some(outcome)
    }
}

/// Deliver an alert and record it in the entity's log.
///
/// The banner always fires. Audio and the remote alert follow the entity's
/// flags. A remote alert without a target device is noted in the log.
fn dispatch<N: NotificationSink>(
    notifier: &N,
    snapshot: &RosterSnapshot,
    entity: &mut TrackedEntity,
    alert: Alert,
) {
    entity.log.record(alert.message.as_str());
    notifier.show_banner(alert.title, &alert.message);

    if alert.audio {
        notifier.announce_audio(&alert.message);
    }

    if alert.remote {
        match alert.remote_target.and_then(|index| snapshot.device(index)) {
            Some(device) => notifier.alert_remote_device(device, &alert.message),
            None => entity
                .log
                .record("Remote alert skipped: no target device selected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{Coordinate, EARTH_RADIUS_METERS};
    use crate::notify::{Notification, RecordingNotifier};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Provider backed by an in-memory map.
    #[derive(Default)]
    struct MapProvider {
        snapshot: RosterSnapshot,
        fixes: Mutex<HashMap<String, Coordinate>>,
    }

    impl MapProvider {
        fn place(&self, reference: &str, at: Coordinate) {
            self.fixes.lock().unwrap().insert(reference.to_string(), at);
        }

        fn remove(&self, reference: &str) {
            self.fixes.lock().unwrap().remove(reference);
        }
    }

    impl LocationProvider for MapProvider {
        async fn roster(&self) -> Result<RosterSnapshot, LocationError> {
            Ok(self.snapshot.clone())
        }

        async fn current_location(
            &self,
            kind: EntityKind,
            reference: &EntityRef,
        ) -> Result<Coordinate, LocationError> {
            self.fixes
                .lock()
                .unwrap()
                .get(reference.as_str())
                .copied()
                .ok_or(LocationError::NoFix {
                    kind,
                    reference: reference.clone(),
                })
        }
    }

    fn north_of(origin: Coordinate, meters: f64) -> Coordinate {
        let dlat = (meters / EARTH_RADIUS_METERS).to_degrees();
        Coordinate::new(origin.latitude + dlat, origin.longitude)
    }

    fn snapshot() -> RosterSnapshot {
        RosterSnapshot::new(
            vec![RosterEntry::person("alice", "Alice", "Smith")],
            vec![
                RosterEntry::device("car", "Car", "AirTag"),
                RosterEntry::device("phone", "Phone", "iPhone"),
            ],
        )
    }

    async fn engine() -> DetectionEngine<Arc<MapProvider>, Arc<RecordingNotifier>> {
        let provider = Arc::new(MapProvider {
            snapshot: snapshot(),
            ..Default::default()
        });
        DetectionEngine::connect(
            provider,
            Arc::new(RecordingNotifier::new()),
            RosterOptions::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_first_fix_sets_baseline_without_alert() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.set(id, "movement.enabled", "true").unwrap();
        engine.provider().place("alice", Coordinate::new(0.0, 0.0));

        let report = engine.run_cycle().await;

        assert_eq!(report.cycle, 1);
        assert_eq!(report.events(), 0);
        assert!(engine.notifier().notifications().is_empty());
        assert_eq!(
            engine.entity(id).unwrap().last_known_location(),
            Some(Coordinate::new(0.0, 0.0))
        );
        assert_eq!(engine.entity(id).unwrap().log().count_containing("Baseline set"), 1);
    }

    #[tokio::test]
    async fn test_movement_alert_and_rebaseline() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.set(id, "movement.enabled", "true").unwrap();
        engine.set(id, "movement.audio", "true").unwrap();

        let origin = Coordinate::new(0.0, 0.0);
        engine.provider().place("alice", origin);
        engine.run_cycle().await;

        let moved_to = north_of(origin, 600.0);
        engine.provider().place("alice", moved_to);
        let report = engine.run_cycle().await;

        assert!(report.outcome(id).unwrap().moved);
        assert_eq!(
            engine.notifier().banners(),
            vec![(MOVEMENT_TITLE.to_string(), "Alice Smith has moved.".to_string())]
        );
        assert_eq!(engine.notifier().audio(), vec!["Alice Smith has moved.".to_string()]);
        assert_eq!(engine.entity(id).unwrap().last_known_location(), Some(moved_to));

        engine.notifier().clear();
        engine.provider().place("alice", north_of(moved_to, 100.0));
        let report = engine.run_cycle().await;
        assert_eq!(report.events(), 0);
        assert!(engine.notifier().notifications().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_movement_follows_latest_fix() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.provider().place("alice", Coordinate::new(1.0, 1.0));

        engine.run_cycle().await;

        assert_eq!(
            engine.entity(id).unwrap().last_known_location(),
            Some(Coordinate::new(1.0, 1.0))
        );
        assert_eq!(engine.entity(id).unwrap().log().len(), 1);
    }

    #[tokio::test]
    async fn test_reenabled_movement_compares_against_latest_poll() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.set(id, "movement.enabled", "true").unwrap();

        let origin = Coordinate::new(0.0, 0.0);
        engine.provider().place("alice", origin);
        engine.run_cycle().await;

        engine.set(id, "movement.enabled", "false").unwrap();
        let away = north_of(origin, 5_000.0);
        engine.provider().place("alice", away);
        engine.run_cycle().await;

        engine.set(id, "movement.enabled", "true").unwrap();
        let report = engine.run_cycle().await;

        assert!(!report.outcome(id).unwrap().moved);
        assert!(engine.notifier().notifications().is_empty());
        assert_eq!(engine.entity(id).unwrap().last_known_location(), Some(away));
    }

    #[tokio::test]
    async fn test_fetch_failure_with_audio_announces_error() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.set(id, "movement.enabled", "true").unwrap();
        engine.set(id, "movement.audio", "true").unwrap();

        let report = engine.run_cycle().await;

        assert_eq!(report.failures(), 1);
        assert_eq!(engine.notifier().audio(), vec![FETCH_ERROR_TEXT.to_string()]);
        assert_eq!(
            engine.entity(id).unwrap().log().count_containing(FETCH_ERROR_TEXT),
            1
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_without_audio_is_silent() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.set(id, "movement.enabled", "true").unwrap();

        let report = engine.run_cycle().await;

        assert_eq!(report.failures(), 1);
        assert!(engine.notifier().notifications().is_empty());
        assert!(engine.entity(id).unwrap().last_known_location().is_none());
    }

    #[tokio::test]
    async fn test_proximity_alert_with_remote_target() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.set(id, "proximity.enabled", "true").unwrap();
        engine.set(id, "proximity.target", "0").unwrap();
        engine.set(id, "proximity.remote", "true").unwrap();
        engine.set(id, "proximity.remote_target", "1").unwrap();

        let origin = Coordinate::new(10.0, 10.0);
        engine.provider().place("alice", origin);
        engine.provider().place("car", north_of(origin, 100.0));

        let report = engine.run_cycle().await;

        assert!(report.outcome(id).unwrap().proximity);
        assert_eq!(
            engine.notifier().notifications(),
            vec![
                Notification::Banner {
                    title: PROXIMITY_TITLE.to_string(),
                    text: "Car (AirTag) is near Alice Smith".to_string(),
                },
                Notification::Remote {
                    device: EntityRef::new("phone"),
                    message: "Car (AirTag) is near Alice Smith".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_remote_alert_defaults_to_first_device() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.set(id, "movement.enabled", "true").unwrap();
        engine.set(id, "movement.remote", "true").unwrap();

        let origin = Coordinate::new(0.0, 0.0);
        engine.provider().place("alice", origin);
        engine.run_cycle().await;
        engine.provider().place("alice", north_of(origin, 1_000.0));
        engine.run_cycle().await;

        assert_eq!(
            engine.notifier().remote(),
            vec![(EntityRef::new("car"), "Alice Smith has moved.".to_string())]
        );
    }

    #[tokio::test]
    async fn test_proximity_defaults_to_first_device() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.set(id, "proximity.enabled", "true").unwrap();

        let origin = Coordinate::new(0.0, 0.0);
        engine.provider().place("alice", origin);
        engine.provider().place("car", north_of(origin, 50.0));

        let report = engine.run_cycle().await;

        assert!(report.outcome(id).unwrap().proximity);
        assert_eq!(
            engine.notifier().banners(),
            vec![(
                PROXIMITY_TITLE.to_string(),
                "Car (AirTag) is near Alice Smith".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_enabling_without_device_rejected_at_set_time() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.set(id, "movement.remote", "true").unwrap();

        let err = engine.set(id, "movement.remote_target", "").unwrap_err();
        assert!(matches!(err, ConfigError::TargetRequired { .. }));
        assert_eq!(engine.get(id, "movement.remote_target").unwrap(), "0");
    }

    #[tokio::test]
    async fn test_reference_fetch_failure_skips_proximity() {
        let mut engine = engine().await;
        let id = engine.track(0).unwrap();
        engine.set(id, "proximity.enabled", "true").unwrap();
        engine.set(id, "proximity.target", "0").unwrap();
        engine.provider().place("alice", Coordinate::new(0.0, 0.0));
        engine.provider().remove("car");

        let report = engine.run_cycle().await;

        assert!(!report.outcome(id).unwrap().fetch_failed);
        assert!(!report.outcome(id).unwrap().proximity);
        assert_eq!(
            engine
                .entity(id)
                .unwrap()
                .log()
                .count_containing("Error retrieving location of Car (AirTag)"),
            1
        );
    }

    #[tokio::test]
    async fn test_on_entry_debounce() {
        let mut engine = engine().await.with_debounce(ProximityDebounce::OnEntry);
        let id = engine.track(0).unwrap();
        engine.set(id, "proximity.enabled", "true").unwrap();
        engine.set(id, "proximity.target", "0").unwrap();

        let origin = Coordinate::new(0.0, 0.0);
        engine.provider().place("alice", origin);
        engine.provider().place("car", origin);

        for _ in 0..3 {
            engine.run_cycle().await;
        }
        assert_eq!(engine.notifier().banners().len(), 1);

        engine.provider().place("car", north_of(origin, 2_000.0));
        engine.run_cycle().await;
        engine.provider().place("car", origin);
        engine.run_cycle().await;

        assert_eq!(engine.notifier().banners().len(), 2);
    }

    #[tokio::test]
    async fn test_log_text_unknown_entity() {
        let engine = engine().await;
        assert_eq!(
            engine.log_text(EntityId(42)),
            Err(ConfigError::UnknownEntity(EntityId(42)))
        );
    }

    #[tokio::test]
    async fn test_cycles_counted() {
        let mut engine = engine().await;
        engine.run_cycle().await;
        let report = engine.run_cycle().await;
        assert_eq!(report.cycle, 2);
        assert_eq!(engine.cycles_run(), 2);
        assert!(report.outcomes.is_empty());
    }
}
