//! Tracking and detection.
//!
//! This module holds everything between "here is a fix" and "raise an
//! alert":
//!
//! - [`TrackingRoster`] - which people and devices are watched, and how
//! - [`EntityConfigKey`] - per-entity settings addressable by name
//! - [`DetectionEngine`] - one detection cycle over every tracked entity
//! - [`Scheduler`] - countdown between cycles
//! - [`TrackerService`] - the daemon that owns the engine
//!
//! # Architecture
//!
//! ```text
//! TrackerHandle ──commands──► TrackerService ──tick──► Scheduler
//!                                   │
//!                                   ▼ (cycle due)
//!                            DetectionEngine
//!                          ┌────────┴─────────┐
//!                 LocationProvider     NotificationSink
//! ```

mod activity;
mod engine;
mod entity;
mod error;
mod keys;
mod policy;
mod roster;
mod scheduler;
mod service;

pub use activity::{ActivityEntry, ActivityLog};
pub use engine::{
    CycleReport, DetectionEngine, EntityOutcome, FETCH_ERROR_TEXT, MOVEMENT_TITLE,
    PROXIMITY_TITLE,
};
pub use entity::{
    EntityId, EntityKind, EntityRef, MovementConfig, MovementState, ProximityConfig,
    TrackedEntity, DEFAULT_THRESHOLD_METERS, DEFAULT_TOLERANCE_METERS,
};
pub use error::ConfigError;
pub use keys::EntityConfigKey;
pub use policy::{
    evaluate_movement, evaluate_proximity, MovementDecision, ProximityDebounce,
    ProximityDecision, ProximityOutcome,
};
pub use roster::{DuplicatePolicy, RosterEntry, RosterOptions, RosterSnapshot, TrackingRoster};
pub use scheduler::{Scheduler, Tick, DEFAULT_STARTUP_DELAY, DEFAULT_STEADY_INTERVAL};
pub use service::{
    ScheduleConfig, ServiceError, TrackedSummary, TrackerHandle, TrackerService, TrackerStatus,
    DEFAULT_TICK,
};
