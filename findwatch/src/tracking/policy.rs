//! Pure detection rules.
//!
//! These functions hold the movement and proximity decisions with no I/O,
//! so the engine only has to fetch, apply the decision, and notify.

use std::str::FromStr;

use super::entity::MovementState;
use crate::coord::{distance_meters, Coordinate};

/// How repeated in-range proximity cycles are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProximityDebounce {
    /// Alert on every cycle the entity is in range.
    #[default]
    EveryCycle,
    /// Alert once on entering range; re-arm after a cycle out of range.
    OnEntry,
}

impl ProximityDebounce {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EveryCycle => "every_cycle",
            Self::OnEntry => "on_entry",
        }
    }
}

impl FromStr for ProximityDebounce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "every_cycle" => Ok(Self::EveryCycle),
            "on_entry" => Ok(Self::OnEntry),
            other => Err(format!("unknown proximity debounce '{}'", other)),
        }
    }
}

/// Result of comparing a fix against the movement baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementDecision {
    /// First fix; becomes the baseline.
    Baseline,
    /// Still within tolerance of the baseline. Baseline is kept.
    Within { distance_m: f64 },
    /// At or beyond tolerance. The fix becomes the new baseline.
    Moved { distance_m: f64 },
}

impl MovementDecision {
    /// State the entity should hold after this decision.
    pub fn next_state(&self, previous: MovementState, fix: Coordinate) -> MovementState {
        match self {
            Self::Baseline | Self::Moved { .. } => MovementState::Armed(fix),
            Self::Within { .. } => previous,
        }
    }
}

/// Compare a fix against the movement baseline.
pub fn evaluate_movement(
    state: &MovementState,
    fix: Coordinate,
    tolerance_meters: f64,
) -> MovementDecision {
    match state {
        MovementState::NoBaseline => MovementDecision::Baseline,
        MovementState::Armed(baseline) => {
            let distance_m = distance_meters(*baseline, fix);
            if distance_m >= tolerance_meters {
                MovementDecision::Moved { distance_m }
            } else {
                MovementDecision::Within { distance_m }
            }
        }
    }
}

/// Proximity verdict for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityDecision {
    /// In range and an alert should be raised.
    Near,
    /// In range but already reported.
    Suppressed,
    /// Out of range.
    Far,
}

/// Proximity verdict together with the updated latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityOutcome {
    pub decision: ProximityDecision,
    pub latched: bool,
}

/// Decide whether a proximity alert fires.
///
/// Strictly less than the threshold counts as near.
pub fn evaluate_proximity(
    distance_m: f64,
    threshold_meters: f64,
    debounce: ProximityDebounce,
    latched: bool,
) -> ProximityOutcome {
    if distance_m >= threshold_meters {
        return ProximityOutcome {
            decision: ProximityDecision::Far,
            latched: false,
        };
    }

    match debounce {
        ProximityDebounce::EveryCycle => ProximityOutcome {
            decision: ProximityDecision::Near,
            latched: false,
        },
        ProximityDebounce::OnEntry if latched => ProximityOutcome {
            decision: ProximityDecision::Suppressed,
            latched: true,
        },
        ProximityDebounce::OnEntry => ProximityOutcome {
            decision: ProximityDecision::Near,
            latched: true,
        },
    }
}
