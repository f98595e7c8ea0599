//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`distance`] - Distance between two coordinates
//! - [`init`] - Configuration initialization
//! - [`roster`] - List trackable persons and devices
//! - [`run`] - Main command (start the tracker)

pub mod config;
pub mod distance;
pub mod init;
pub mod roster;
pub mod run;
