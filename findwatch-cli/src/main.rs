//! findwatch CLI - Command-line interface
//!
//! Watches people and devices on a location-sharing account and raises
//! alerts when they move or come near each other.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "findwatch")]
#[command(version = findwatch::VERSION)]
#[command(about = "Movement and proximity alerts for shared locations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the tracker and keep checking on a schedule
    Run {
        /// Configuration file (default: ~/.findwatch/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Location snapshot file (overrides provider.snapshot_file)
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Enable debug-level logging
        #[arg(long)]
        debug: bool,

        /// Run a single detection cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// List the persons and devices available for tracking
    Roster {
        /// Configuration file (default: ~/.findwatch/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Location snapshot file (overrides provider.snapshot_file)
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Great-circle distance in meters between two points
    #[command(allow_negative_numbers = true)]
    Distance {
        /// First latitude in decimal degrees
        lat1: f64,
        /// First longitude in decimal degrees
        lon1: f64,
        /// Second latitude in decimal degrees
        lat2: f64,
        /// Second longitude in decimal degrees
        lon2: f64,
    },

    /// Create ~/.findwatch/config.ini with default settings
    Init,

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            snapshot,
            debug,
            once,
        } => commands::run::run(RunArgs {
            config,
            snapshot,
            debug,
            once,
        }),
        Commands::Roster { config, snapshot } => {
            commands::roster::run(config.as_deref(), snapshot.as_deref())
        }
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => commands::distance::run(lat1, lon1, lat2, lon2),
        Commands::Init => commands::init::run(),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
