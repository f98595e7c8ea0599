//! findwatch - movement and proximity alerts for tracked people and devices
//!
//! This library polls the location of selected people and devices, notices
//! when one moves beyond a tolerance or comes near a reference device, and
//! raises audio, banner, or remote-device alerts.
//!
//! # High-Level API
//!
//! ```ignore
//! use findwatch::config::ConfigFile;
//! use findwatch::notify::TracingNotifier;
//! use findwatch::provider::SnapshotFileProvider;
//! use findwatch::tracking::{DetectionEngine, TrackerService};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ConfigFile::load()?;
//! let provider = SnapshotFileProvider::new(&config.provider.snapshot_file);
//! let engine =
//!     DetectionEngine::connect(provider, TracingNotifier, config.roster_options()).await?;
//!
//! let cancellation = CancellationToken::new();
//! let (handle, task) = TrackerService::new(engine, config.schedule_config())
//!     .start(cancellation.clone());
//! ```

pub mod config;
pub mod coord;
pub mod logging;
pub mod notify;
pub mod provider;
pub mod tracking;

/// Version of the findwatch library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
