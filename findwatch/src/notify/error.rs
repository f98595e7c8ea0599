//! Error types for notification delivery.

use thiserror::Error;

/// Notification delivery failures.
///
/// Sinks log these and carry on. They never reach the detection engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotifyError {
    /// No command is configured for this channel.
    #[error("No {0} command configured")]
    NotConfigured(&'static str),

    /// The command could not be started.
    #[error("Failed to run '{program}': {reason}")]
    Spawn { program: String, reason: String },

    /// The command was still running when its time ran out.
    #[error("'{program}' did not finish within {millis} ms")]
    TimedOut { program: String, millis: u128 },

    /// The command ran but reported failure.
    #[error("'{program}' exited with {status}")]
    Failed { program: String, status: String },
}
