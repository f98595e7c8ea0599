//! Tracker daemon.
//!
//! [`TrackerService`] owns the [`DetectionEngine`] on a single tokio task.
//! It ticks once per second (configurable), counts down with the
//! [`Scheduler`], and runs a detection cycle inline when one is due. Nothing
//! else touches the engine: configuration changes arrive as messages from a
//! [`TrackerHandle`] and are applied between ticks.
//!
//! # Example
//!
//! ```ignore
//! use findwatch::tracking::{ScheduleConfig, TrackerService};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancellation = CancellationToken::new();
//! let service = TrackerService::new(engine, ScheduleConfig::default());
//! let (handle, task) = service.start(cancellation.clone());
//!
//! let id = handle.track(0).await?;
//! handle.set(id, "movement.enabled", "true").await?;
//!
//! // later
//! cancellation.cancel();
//! task.await?;
//! ```

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::engine::{CycleReport, DetectionEngine};
use super::entity::{EntityId, EntityKind, EntityRef};
use super::error::ConfigError;
use super::scheduler::{Scheduler, Tick, DEFAULT_STARTUP_DELAY, DEFAULT_STEADY_INTERVAL};
use crate::coord::Coordinate;
use crate::notify::NotificationSink;
use crate::provider::LocationProvider;

/// Default tick length.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Capacity of the command channel.
const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Errors returned through a [`TrackerHandle`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The tracker task has stopped.
    #[error("Tracker service is not running")]
    Stopped,

    /// The request was rejected by the engine.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Polling cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Ticks before the first cycle.
    pub startup_delay: u32,
    /// Ticks between cycles.
    pub steady_interval: u32,
    /// Length of one tick.
    pub tick: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            startup_delay: DEFAULT_STARTUP_DELAY,
            steady_interval: DEFAULT_STEADY_INTERVAL,
            tick: DEFAULT_TICK,
        }
    }
}

/// Snapshot of the daemon's state, published after every tick and command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerStatus {
    /// Ticks until the next cycle.
    pub countdown: u32,
    pub cycles_run: u64,
    /// Number of tracked entities.
    pub tracked: usize,
    /// Alerts raised by the most recent cycle.
    pub last_events: usize,
    /// Failed lookups in the most recent cycle.
    pub last_failures: usize,
}

/// Display summary of a tracked entity.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedSummary {
    pub id: EntityId,
    pub kind: EntityKind,
    pub display_name: String,
    pub movement_enabled: bool,
    pub proximity_enabled: bool,
    pub last_known_location: Option<Coordinate>,
}

type Reply<T> = oneshot::Sender<Result<T, ConfigError>>;

enum Command {
    Track {
        index: usize,
        reply: Reply<EntityId>,
    },
    TrackReference {
        kind: EntityKind,
        reference: EntityRef,
        reply: Reply<EntityId>,
    },
    Untrack {
        id: EntityId,
        reply: Reply<()>,
    },
    Set {
        id: EntityId,
        key: String,
        value: String,
        reply: Reply<()>,
    },
    Get {
        id: EntityId,
        key: String,
        reply: Reply<String>,
    },
    LogText {
        id: EntityId,
        reply: Reply<String>,
    },
    Entities {
        reply: oneshot::Sender<Vec<TrackedSummary>>,
    },
    RunNow {
        reply: oneshot::Sender<CycleReport>,
    },
}

/// The tracker daemon.
pub struct TrackerService<P, N> {
    engine: DetectionEngine<P, N>,
    scheduler: Scheduler,
    tick: Duration,
    status_tx: watch::Sender<TrackerStatus>,
    last_report: Option<CycleReport>,
}

impl<P, N> TrackerService<P, N>
where
    P: LocationProvider + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(engine: DetectionEngine<P, N>, schedule: ScheduleConfig) -> Self {
        let scheduler = Scheduler::new(schedule.startup_delay, schedule.steady_interval);
        let (status_tx, _) = watch::channel(TrackerStatus::default());
        Self {
            engine,
            scheduler,
            tick: schedule.tick,
            status_tx,
            last_report: None,
        }
    }

    /// Spawn the daemon.
    ///
    /// The task runs until `cancellation` fires. A cycle in progress when
    /// that happens is allowed to finish.
    pub fn start(self, cancellation: CancellationToken) -> (TrackerHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let status_rx = self.status_tx.subscribe();
        self.publish();

        let task = tokio::spawn(self.run(command_rx, cancellation));
        (TrackerHandle::new(status_rx, command_tx), task)
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>, cancellation: CancellationToken) {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        tracing::info!(
            startup_delay = self.scheduler.startup_delay(),
            interval = self.scheduler.steady_interval(),
            tracked = self.engine.roster().len(),
            "Tracker service started"
        );

        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => {
                    tracing::info!(
                        cycles_run = self.engine.cycles_run(),
                        "Tracker service stopped"
                    );
                    break;
                }

                _ = ticker.tick() => {
                    if self.scheduler.tick() == Tick::CycleDue {
                        self.run_cycle().await;
                    }
                    self.publish();
                }

                Some(command) = commands.recv() => {
                    self.handle(command).await;
                    self.publish();
                }
            }
        }
    }

    async fn run_cycle(&mut self) -> CycleReport {
        let report = self.engine.run_cycle().await;
        self.scheduler.cycle_completed();
        self.last_report = Some(report.clone());
        report
    }

    async fn handle(&mut self, command: Command) {
        // A dropped reply receiver just means the caller stopped waiting.
        match command {
            Command::Track { index, reply } => {
                let _ = reply.send(self.engine.track(index));
            }
            Command::TrackReference {
                kind,
                reference,
                reply,
            } => {
                let _ = reply.send(self.engine.track_reference(kind, &reference));
            }
            Command::Untrack { id, reply } => {
                let _ = reply.send(self.engine.untrack(id));
            }
            Command::Set {
                id,
                key,
                value,
                reply,
            } => {
                let result = self.engine.set(id, &key, &value);
                if let Err(e) = &result {
                    tracing::debug!(id = %id, key = %key, error = %e, "Setting rejected");
                }
                let _ = reply.send(result);
            }
            Command::Get { id, key, reply } => {
                let _ = reply.send(self.engine.get(id, &key));
            }
            Command::LogText { id, reply } => {
                let _ = reply.send(self.engine.log_text(id));
            }
            Command::Entities { reply } => {
                let _ = reply.send(self.summaries());
            }
            Command::RunNow { reply } => {
                let report = self.run_cycle().await;
                let _ = reply.send(report);
            }
        }
    }

    fn summaries(&self) -> Vec<TrackedSummary> {
        self.engine
            .entities()
            .iter()
            .map(|e| TrackedSummary {
                id: e.id(),
                kind: e.kind(),
                display_name: e.display_name().to_string(),
                movement_enabled: e.movement().enabled,
                proximity_enabled: e.proximity().enabled,
                last_known_location: e.last_known_location(),
            })
            .collect()
    }

    fn publish(&self) {
        let (last_events, last_failures) = self
            .last_report
            .as_ref()
            .map(|r| (r.events(), r.failures()))
            .unwrap_or_default();

        self.status_tx.send_replace(TrackerStatus {
            countdown: self.scheduler.countdown(),
            cycles_run: self.engine.cycles_run(),
            tracked: self.engine.roster().len(),
            last_events,
            last_failures,
        });
    }
}

/// Cloneable handle to a running [`TrackerService`].
#[derive(Clone)]
pub struct TrackerHandle {
    status_rx: watch::Receiver<TrackerStatus>,
    command_tx: mpsc::Sender<Command>,
}

impl TrackerHandle {
    fn new(status_rx: watch::Receiver<TrackerStatus>, command_tx: mpsc::Sender<Command>) -> Self {
        Self {
            status_rx,
            command_tx,
        }
    }

    /// Most recently published status.
    pub fn status(&self) -> TrackerStatus {
        self.status_rx.borrow().clone()
    }

    /// Receiver that observes every status update.
    pub fn subscribe(&self) -> watch::Receiver<TrackerStatus> {
        self.status_rx.clone()
    }

    /// True once the daemon task has gone away.
    pub fn is_stopped(&self) -> bool {
        self.command_tx.is_closed()
    }

    pub async fn track(&self, index: usize) -> Result<EntityId, ServiceError> {
        self.request(|reply| Command::Track { index, reply }).await
    }

    pub async fn track_reference(
        &self,
        kind: EntityKind,
        reference: EntityRef,
    ) -> Result<EntityId, ServiceError> {
        self.request(|reply| Command::TrackReference {
            kind,
            reference,
            reply,
        })
        .await
    }

    pub async fn untrack(&self, id: EntityId) -> Result<(), ServiceError> {
        self.request(|reply| Command::Untrack { id, reply }).await
    }

    pub async fn set(&self, id: EntityId, key: &str, value: &str) -> Result<(), ServiceError> {
        let (key, value) = (key.to_string(), value.to_string());
        self.request(|reply| Command::Set {
            id,
            key,
            value,
            reply,
        })
        .await
    }

    pub async fn get(&self, id: EntityId, key: &str) -> Result<String, ServiceError> {
        let key = key.to_string();
        self.request(|reply| Command::Get { id, key, reply }).await
    }

    pub async fn log_text(&self, id: EntityId) -> Result<String, ServiceError> {
        self.request(|reply| Command::LogText { id, reply }).await
    }

    pub async fn entities(&self) -> Result<Vec<TrackedSummary>, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Entities { reply }).await?;
        rx.await.map_err(|_| ServiceError::Stopped)
    }

    /// Run a cycle immediately and restart the countdown.
    pub async fn run_now(&self) -> Result<CycleReport, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::RunNow { reply }).await?;
        rx.await.map_err(|_| ServiceError::Stopped)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(build(reply)).await?;
        let result = rx.await.map_err(|_| ServiceError::Stopped)?;
        Ok(result?)
    }

    async fn send(&self, command: Command) -> Result<(), ServiceError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| ServiceError::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::provider::LocationError;
    use crate::tracking::{RosterEntry, RosterOptions, RosterSnapshot, TrackingRoster};
    use std::sync::Arc;

    /// Every entity sits at the same place; lookups take `delay`.
    struct FixedProvider {
        delay: Duration,
    }

    impl LocationProvider for FixedProvider {
        async fn roster(&self) -> Result<RosterSnapshot, LocationError> {
            Ok(snapshot())
        }

        async fn current_location(
            &self,
            _kind: EntityKind,
            _reference: &EntityRef,
        ) -> Result<Coordinate, LocationError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(Coordinate::new(0.0, 0.0))
        }
    }

    fn snapshot() -> RosterSnapshot {
        RosterSnapshot::new(
            vec![RosterEntry::person("alice", "Alice", "Smith")],
            vec![RosterEntry::device("car", "Car", "AirTag")],
        )
    }

    fn service(
        delay: Duration,
        startup_delay: u32,
        steady_interval: u32,
    ) -> TrackerService<FixedProvider, Arc<RecordingNotifier>> {
        let engine = DetectionEngine::new(
            FixedProvider { delay },
            Arc::new(RecordingNotifier::new()),
            TrackingRoster::with_options(snapshot(), RosterOptions::default()),
        );
        TrackerService::new(
            engine,
            ScheduleConfig {
                startup_delay,
                steady_interval,
                tick: Duration::from_secs(1),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_follow_schedule() {
        let cancellation = CancellationToken::new();
        let (handle, task) = service(Duration::ZERO, 3, 5).start(cancellation.clone());

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(handle.status().cycles_run, 0);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.status().cycles_run, 1);
        assert_eq!(handle.status().countdown, 5);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(handle.status().cycles_run, 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.status().cycles_run, 2);

        cancellation.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_apply_between_ticks() {
        let cancellation = CancellationToken::new();
        let (handle, task) = service(Duration::ZERO, 100, 100).start(cancellation.clone());

        let id = handle.track(0).await.unwrap();
        handle.set(id, "movement.enabled", "true").await.unwrap();
        assert_eq!(handle.get(id, "movement.enabled").await.unwrap(), "true");
        assert_eq!(handle.status().tracked, 1);

        let err = handle.set(id, "proximity.target", "5").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Config(ConfigError::TargetOutOfRange { .. })
        ));

        let report = handle.run_now().await.unwrap();
        assert_eq!(report.cycle, 1);
        assert!(handle
            .log_text(id)
            .await
            .unwrap()
            .contains("Baseline set"));

        let entities = handle.entities().await.unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].display_name, "Alice Smith");
        assert!(entities[0].movement_enabled);

        handle.untrack(id).await.unwrap();
        assert_eq!(handle.status().tracked, 0);

        cancellation.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_lets_cycle_finish() {
        let cancellation = CancellationToken::new();
        let (handle, task) = service(Duration::from_secs(10), 1, 100).start(cancellation.clone());
        handle.track(0).await.unwrap();

        // Cycle starts at t=1s and needs 10s for the lookup.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(handle.status().cycles_run, 0);

        cancellation.cancel();
        task.await.unwrap();

        assert_eq!(handle.status().cycles_run, 1);
        assert!(handle.is_stopped());
        assert_eq!(handle.track(0).await, Err(ServiceError::Stopped));
    }
}
