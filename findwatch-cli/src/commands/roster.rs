//! Roster command - list what the account exposes for tracking.

use std::fmt::Write;
use std::path::Path;

use findwatch::provider::{LocationProvider, SnapshotFileProvider};
use findwatch::tracking::RosterSnapshot;

use crate::error::CliError;
use crate::runner::load_config;

/// Print the persons and devices in the current snapshot.
pub fn run(config_path: Option<&Path>, snapshot: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let path = snapshot
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.provider.snapshot_file.clone());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let provider = SnapshotFileProvider::new(&path);
    let roster = runtime.block_on(provider.roster())?;

    print!("{}", render(&roster));
    Ok(())
}

/// Format the roster as two tables.
///
/// Device numbers are the values `proximity.target` and the
/// `*.remote_target` settings take.
fn render(roster: &RosterSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Persons ({})", roster.persons.len());
    let _ = writeln!(out, "===========");
    if roster.persons.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for entry in &roster.persons {
        let _ = writeln!(out, "  {:<24} {}", entry.reference.as_str(), entry.display_name);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Devices ({})", roster.devices.len());
    let _ = writeln!(out, "===========");
    if roster.devices.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (index, entry) in roster.devices.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}  {:<24} {}",
            index, entry.reference.as_str(), entry.display_name
        );
    }

    out
}
