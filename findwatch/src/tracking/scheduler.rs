//! Polling countdown.
//!
//! The scheduler counts ticks (one second each in the service) down to the
//! next detection cycle. The first cycle waits for the short startup delay;
//! every later cycle waits for the full steady interval, counted from when
//! the previous cycle finished.

/// Ticks before the first cycle.
pub const DEFAULT_STARTUP_DELAY: u32 = 10;

/// Ticks between cycles.
pub const DEFAULT_STEADY_INTERVAL: u32 = 120;

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not yet; this many ticks remain.
    Waiting(u32),
    /// Run a cycle now, then call [`Scheduler::cycle_completed`].
    CycleDue,
}

/// Tick-driven countdown to the next detection cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    startup_delay: u32,
    steady_interval: u32,
    countdown: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_STARTUP_DELAY, DEFAULT_STEADY_INTERVAL)
    }
}

impl Scheduler {
    /// Create a scheduler. Zero values are raised to one tick.
    pub fn new(startup_delay: u32, steady_interval: u32) -> Self {
        let startup_delay = startup_delay.max(1);
        Self {
            startup_delay,
            steady_interval: steady_interval.max(1),
            countdown: startup_delay,
        }
    }

    /// Advance by one tick.
    ///
    /// Once a cycle is due the countdown stays at zero until
    /// [`cycle_completed`](Self::cycle_completed) is called, so a slow cycle
    /// can never be followed by an overlapping one.
    pub fn tick(&mut self) -> Tick {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            Tick::CycleDue
        } else {
            Tick::Waiting(self.countdown)
        }
    }

    /// Restart the countdown at the steady interval.
    pub fn cycle_completed(&mut self) {
        self.countdown = self.steady_interval;
    }

    /// Ticks (seconds) until the next cycle.
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn startup_delay(&self) -> u32 {
        self.startup_delay
    }

    pub fn steady_interval(&self) -> u32 {
        self.steady_interval
    }
}
