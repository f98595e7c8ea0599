//! Run command - start the tracker.
//!
//! Loads the roster from the snapshot file, installs the configured watches
//! and drives the scheduled detection loop until Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use findwatch::config::{config_file_path, install_watches, ConfigFile};
use findwatch::notify::{CommandNotifier, FanoutNotifier, TracingNotifier};
use findwatch::provider::SnapshotFileProvider;
use findwatch::tracking::{
    CycleReport, DetectionEngine, TrackerHandle, TrackerService, TrackerStatus,
};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub debug: bool,
    pub once: bool,
}

/// Run the tracker.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("run");

    let config = runner.config();
    let snapshot = args
        .snapshot
        .unwrap_or_else(|| config.provider.snapshot_file.clone());

    println!("findwatch v{}", findwatch::VERSION);
    println!("  Snapshot: {}", snapshot.display());
    println!("  Log file: {}", runner.log_path().display());
    println!();

    let runtime = runner.runtime()?;
    runtime.block_on(run_tracker(config, snapshot, args.once))
}

/// Notifier used by the CLI: every alert is logged, then handed to the
/// configured commands.
fn build_notifier(config: &ConfigFile) -> FanoutNotifier {
    FanoutNotifier::new()
        .with(Arc::new(TracingNotifier::new()))
        .with(Arc::new(CommandNotifier::new(config.command_templates())))
}

async fn run_tracker(config: &ConfigFile, snapshot: PathBuf, once: bool) -> Result<(), CliError> {
    let provider = SnapshotFileProvider::new(&snapshot);
    let mut engine =
        DetectionEngine::connect(provider, build_notifier(config), config.roster_options())
            .await?
            .with_debounce(config.detection.proximity_debounce);

    let installed = install_watches(&mut engine, &config.watches);
    if installed.is_empty() {
        println!(
            "Warning: no watches configured. Add [watch.N] sections to {}",
            config_file_path().display()
        );
    }
    for entity in engine.entities() {
        println!(
            "  Watching {} {} ({})",
            entity.kind(),
            entity.display_name(),
            entity.id()
        );
    }
    println!();

    let cancellation = CancellationToken::new();
    let (handle, task) = TrackerService::new(engine, config.schedule_config())
        .start(cancellation.clone());

    let result = if once {
        run_once(&handle).await
    } else {
        run_until_interrupted(&handle).await
    };

    cancellation.cancel();
    if let Err(e) = task.await {
        warn!(error = %e, "Tracker task ended abnormally");
    }
    info!("Tracker stopped");

    result
}

async fn run_once(handle: &TrackerHandle) -> Result<(), CliError> {
    let report = handle.run_now().await?;
    println!("{}", summarize(&report));
    Ok(())
}

async fn run_until_interrupted(handle: &TrackerHandle) -> Result<(), CliError> {
    let schedule_start = handle.status();
    println!(
        "First check in {}s. Press Ctrl+C to stop.",
        schedule_start.countdown
    );

    let mut status = handle.subscribe();
    let mut cycles_seen = schedule_start.cycles_run;

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(CliError::Runtime)?;
                println!();
                println!("Shutting down...");
                return Ok(());
            }
            changed = status.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                if let Some(line) = cycle_line(&mut status, &mut cycles_seen) {
                    println!("{}", line);
                }
            }
        }
    }
}

/// Status line for a newly finished cycle, if one finished since the last call.
fn cycle_line(
    status: &mut watch::Receiver<TrackerStatus>,
    cycles_seen: &mut u64,
) -> Option<String> {
    let current = status.borrow_and_update().clone();
    if current.cycles_run == *cycles_seen {
        return None;
    }
    *cycles_seen = current.cycles_run;
    Some(format!(
        "Cycle {}: {} tracked, {} alert(s), {} failure(s); next check in {}s",
        current.cycles_run,
        current.tracked,
        current.last_events,
        current.last_failures,
        current.countdown
    ))
}

fn summarize(report: &CycleReport) -> String {
    format!(
        "Cycle {}: {} checked, {} alert(s), {} failure(s)",
        report.cycle,
        report.outcomes.len(),
        report.events(),
        report.failures()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use findwatch::tracking::{EntityId, EntityOutcome};

    #[test]
    fn test_summarize_counts() {
        let moved = EntityOutcome {
            entity: EntityId(1),
            fetch_failed: false,
            moved: true,
            proximity: false,
        };
        let failed = EntityOutcome {
            entity: EntityId(2),
            fetch_failed: true,
            moved: false,
            proximity: false,
        };

        let report = CycleReport {
            cycle: 3,
            outcomes: vec![moved, failed],
        };
        assert_eq!(
            summarize(&report),
            "Cycle 3: 2 checked, 1 alert(s), 1 failure(s)"
        );
    }

    #[test]
    fn test_cycle_line_only_on_new_cycle() {
        let (tx, mut rx) = watch::channel(TrackerStatus::default());
        let mut seen = 0;

        tx.send_replace(TrackerStatus {
            countdown: 5,
            ..Default::default()
        });
        assert!(cycle_line(&mut rx, &mut seen).is_none());

        tx.send_replace(TrackerStatus {
            countdown: 120,
            cycles_run: 1,
            tracked: 2,
            last_events: 1,
            last_failures: 0,
        });
        let line = cycle_line(&mut rx, &mut seen).unwrap();
        assert_eq!(
            line,
            "Cycle 1: 2 tracked, 1 alert(s), 0 failure(s); next check in 120s"
        );
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_build_notifier_has_log_and_command_sinks() {
        let notifier = build_notifier(&ConfigFile::default());
        assert_eq!(notifier.len(), 2);
    }
}
