//! Sink that runs OS commands.
//!
//! Each channel has a command template. The template is split on
//! whitespace and every token has its placeholders substituted, so a
//! placeholder always expands to exactly one argument no matter what text
//! it carries. Nothing goes through a shell.
//!
//! | Placeholder     | Channel | Value                                   |
//! |-----------------|---------|-----------------------------------------|
//! | `{text}`        | audio, banner | spoken or banner text             |
//! | `{title}`       | banner  | banner title                            |
//! | `{applescript}` | banner  | `display notification "…" with title "…"` |
//! | `{device_id}`   | remote  | device reference                        |
//! | `{device}`      | remote  | device display name                     |
//! | `{message}`     | remote  | alert text                              |
//!
//! An empty template disables the channel.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

use super::{NotificationSink, NotifyError};
use crate::tracking::RosterEntry;

/// Default audio command.
pub const DEFAULT_AUDIO_COMMAND: &str = "say {text}";

/// Default banner command.
#[cfg(target_os = "macos")]
pub const DEFAULT_BANNER_COMMAND: &str = "osascript -e {applescript}";

/// Default banner command.
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_BANNER_COMMAND: &str = "notify-send {title} {text}";

/// Command templates for each channel.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTemplates {
    pub audio: String,
    pub banner: String,
    pub remote: String,
}

impl Default for CommandTemplates {
    fn default() -> Self {
        Self {
            audio: DEFAULT_AUDIO_COMMAND.to_string(),
            banner: DEFAULT_BANNER_COMMAND.to_string(),
            remote: String::new(),
        }
    }
}

/// Longest a notification command may run before it is killed.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Notification commands allowed to run at once.
pub const DEFAULT_MAX_RUNNING: usize = 4;

/// Runs a configured command per notification.
///
/// Commands run as tasks on the current tokio runtime. At most
/// `max_running` run at once; a notification arriving while every slot is
/// busy is dropped with a warning. A command still running after the
/// timeout is killed. Failures are logged at `warn`.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    templates: CommandTemplates,
    timeout: Duration,
    max_running: usize,
    slots: Arc<Semaphore>,
}

impl Default for CommandNotifier {
    fn default() -> Self {
        Self::new(CommandTemplates::default())
    }
}

impl CommandNotifier {
    pub fn new(templates: CommandTemplates) -> Self {
        Self {
            templates,
            timeout: DEFAULT_COMMAND_TIMEOUT,
            max_running: DEFAULT_MAX_RUNNING,
            slots: Arc::new(Semaphore::new(DEFAULT_MAX_RUNNING)),
        }
    }

    /// Set the per-command timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many commands may run at once (at least one).
    pub fn with_max_running(mut self, max_running: usize) -> Self {
        self.max_running = max_running.max(1);
        self.slots = Arc::new(Semaphore::new(self.max_running));
        self
    }

    pub fn templates(&self) -> &CommandTemplates {
        &self.templates
    }

    /// Number of commands currently running.
    pub fn running(&self) -> usize {
        self.max_running - self.slots.available_permits()
    }

    /// Expand a template into program and arguments.
    pub fn build_command(
        channel: &'static str,
        template: &str,
        vars: &[(&str, &str)],
    ) -> Result<Vec<String>, NotifyError> {
        let argv: Vec<String> = template
            .split_whitespace()
            .map(|token| substitute(token, vars))
            .collect();

        if argv.is_empty() {
            return Err(NotifyError::NotConfigured(channel));
        }
        Ok(argv)
    }

    fn dispatch(&self, channel: &'static str, template: &str, vars: &[(&str, &str)]) {
        let argv = match Self::build_command(channel, template, vars) {
            Ok(argv) => argv,
            Err(e) => {
                tracing::debug!(channel, error = %e, "Notification skipped");
                return;
            }
        };

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(channel, "Notification skipped: no async runtime");
            return;
        };

        let Ok(permit) = Arc::clone(&self.slots).try_acquire_owned() else {
            tracing::warn!(
                channel,
                max_running = self.max_running,
                "Notification dropped: too many commands still running"
            );
            return;
        };

        // Start the child now so it runs even if the runtime shuts down
        // before the supervising task is polled.
        let _entered = runtime.enter();
        let child = match start(&argv) {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(channel, error = %e, "Notification command failed");
                return;
            }
        };

        let timeout = self.timeout;
        runtime.spawn(async move {
            let _permit = permit;
            if let Err(e) = supervise(&argv[0], child, timeout).await {
                tracing::warn!(channel, error = %e, "Notification command failed");
            }
        });
    }
}

impl NotificationSink for CommandNotifier {
    fn announce_audio(&self, text: &str) {
        self.dispatch("audio", &self.templates.audio, &[("text", text)]);
    }

    fn show_banner(&self, title: &str, text: &str) {
        let script = applescript_notification(title, text);
        self.dispatch(
            "banner",
            &self.templates.banner,
            &[("title", title), ("text", text), ("applescript", &script)],
        );
    }

    fn alert_remote_device(&self, device: &RosterEntry, message: &str) {
        self.dispatch(
            "remote",
            &self.templates.remote,
            &[
                ("device_id", device.reference.as_str()),
                ("device", &device.display_name),
                ("message", message),
            ],
        );
    }
}

fn start(argv: &[String]) -> Result<Child, NotifyError> {
    let (program, args) = argv
        .split_first()
        .ok_or(NotifyError::NotConfigured("command"))?;

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| NotifyError::Spawn {
            program: program.clone(),
            reason: e.to_string(),
        })
}

/// Wait for a started command, killing it once `timeout` has passed.
async fn supervise(program: &str, mut child: Child, timeout: Duration) -> Result<(), NotifyError> {
    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(status) => status.map_err(|e| NotifyError::Spawn {
            program: program.to_string(),
            reason: e.to_string(),
        })?,
        Err(_) => {
            let _ = child.kill().await;
            return Err(NotifyError::TimedOut {
                program: program.to_string(),
                millis: timeout.as_millis(),
            });
        }
    };

    if status.success() {
        Ok(())
    } else {
        Err(NotifyError::Failed {
            program: program.to_string(),
            status: status.to_string(),
        })
    }
}

fn substitute(token: &str, vars: &[(&str, &str)]) -> String {
    let mut out = token.to_string();
    for (name, value) in vars {
        let placeholder = format!("{{{}}}", name);
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, value);
        }
    }
    out
}

/// AppleScript that posts a notification banner.
fn applescript_notification(title: &str, text: &str) -> String {
    format!(
        "display notification \"{}\" with title \"{}\"",
        escape_applescript(text),
        escape_applescript(title)
    )
}

fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
