//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use findwatch::config::{config_file_path, ConfigFileError};
use findwatch::provider::LocationError;
use findwatch::tracking::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Bad command-line value
    InvalidArgument(String),
    /// Could not read the roster or a location
    Provider(LocationError),
    /// Tracker service stopped or rejected a request
    Service(ServiceError),
    /// Failed to start the async runtime or signal handler
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Provider(LocationError::Unavailable(_)) => {
                eprintln!();
                eprintln!("The location snapshot could not be read. Make sure:");
                eprintln!("  1. The bridge that exports locations is running");
                eprintln!("  2. provider.snapshot_file points at its output file");
                eprintln!("     (see: findwatch config get provider.snapshot_file)");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Configuration file: {}", config_file_path().display());
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Provider(e) => write!(f, "Location provider error: {}", e),
            CliError::Service(e) => write!(f, "Tracker error: {}", e),
            CliError::Runtime(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Provider(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LocationError> for CliError {
    fn from(e: LocationError) -> Self {
        CliError::Provider(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}
