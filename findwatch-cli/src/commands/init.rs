//! Init command - write a default configuration file.

use findwatch::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Create the config file if it does not exist yet.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();

    if path.exists() {
        println!("Configuration already exists at {}", path.display());
        return Ok(());
    }

    let path = ConfigFile::ensure_exists()?;
    println!("Created {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Point provider.snapshot_file at your location export");
    println!("  2. Run 'findwatch roster' to see what can be tracked");
    println!("  3. Add [watch.N] sections, then 'findwatch run'");

    Ok(())
}
