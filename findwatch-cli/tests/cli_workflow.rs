//! Integration tests for the findwatch binary.
//!
//! These tests run the built CLI against temporary config and snapshot
//! files:
//! - `distance` prints meters between two points
//! - `roster` lists persons and numbered devices from a snapshot
//! - `run --once` installs watches and completes a cycle
//!
//! Run with: `cargo test -p findwatch-cli --test cli_workflow`

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

const SNAPSHOT: &str = r#"{
  "persons": [
    { "id": "alice", "first_name": "Alice", "last_name": "Smith",
      "location": { "latitude": 51.5073, "longitude": -0.1657 } }
  ],
  "devices": [
    { "id": "car", "name": "Family Car", "model": "AirTag",
      "location": { "latitude": 51.5080, "longitude": -0.1657 } }
  ]
}"#;

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_findwatch"))
        .args(args)
        .output()
        .expect("Failed to execute CLI command")
}

fn assert_success(output: &Output, context: &str) {
    if !output.status.success() {
        panic!(
            "{} failed:\nstdout: {}\nstderr: {}",
            context,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Write a snapshot plus a config that points at it and logs into `dir`.
fn create_workspace(dir: &Path) -> (PathBuf, PathBuf) {
    let snapshot = dir.join("snapshot.json");
    std::fs::write(&snapshot, SNAPSHOT).unwrap();

    let config = dir.join("config.ini");
    std::fs::write(
        &config,
        format!(
            "[provider]\nsnapshot_file = {}\n\n\
             [notifications]\naudio_command =\nbanner_command =\nremote_command =\n\n\
             [logging]\nfile = {}\n\n\
             [watch.1]\nkind = person\nreference = alice\n\
             movement.enabled = true\nproximity.enabled = true\nproximity.target = 0\n",
            snapshot.display(),
            dir.join("findwatch.log").display()
        ),
    )
    .unwrap();

    (config, snapshot)
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_distance_command() {
    let output = run_cli(&["distance", "0", "0", "1", "0"]);
    assert_success(&output, "distance");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "111194.9 m");
}

#[test]
fn test_distance_accepts_negative_coordinates() {
    let output = run_cli(&["distance", "-33.86", "151.21", "-33.86", "151.21"]);
    assert_success(&output, "distance with negatives");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "0.0 m");
}

#[test]
fn test_roster_command_lists_snapshot() {
    let temp = TempDir::new().unwrap();
    let (config, _) = create_workspace(temp.path());

    let output = run_cli(&["roster", "--config", config.to_str().unwrap()]);
    assert_success(&output, "roster");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Alice Smith"));
    assert!(stdout.contains("Family Car (AirTag)"));
}

#[test]
fn test_roster_missing_snapshot_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_cli(&[
        "roster",
        "--config",
        temp.path().join("none.ini").to_str().unwrap(),
        "--snapshot",
        temp.path().join("missing.json").to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_run_once_completes_a_cycle() {
    let temp = TempDir::new().unwrap();
    let (config, _) = create_workspace(temp.path());

    let output = run_cli(&["run", "--once", "--config", config.to_str().unwrap()]);
    assert_success(&output, "run --once");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Watching person Alice Smith"));
    assert!(stdout.contains("Cycle 1: 1 checked, 1 alert(s), 0 failure(s)"));

    let log = std::fs::read_to_string(temp.path().join("findwatch.log")).unwrap();
    assert!(log.contains("Proximity detected"));
}
