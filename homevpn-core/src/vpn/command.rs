//! External shell command execution
//!
//! Commands run through `sh -c` with stderr folded into stdout, synchronously
//! from the caller's point of view and without a timeout.

use crate::activity::ActivityLog;
use crate::error::CommandError;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, warn};

/// Text returned by [`CommandRunner::run`] when the shell could not be started
pub const COMMAND_FAILED: &str = "Error: Failed to execute command";

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Merged stdout and stderr, without its trailing newline
    pub output: String,
    pub success: bool,
}

/// Runs configured commands and reports their output to the activity log
#[derive(Clone)]
pub struct CommandRunner {
    log: Arc<ActivityLog>,
}

impl CommandRunner {
    pub fn new(log: Arc<ActivityLog>) -> Self {
        Self { log }
    }

    /// Run `command` and return its trimmed, merged output
    ///
    /// Never fails: a launch failure is logged and yields [`COMMAND_FAILED`].
    /// Any non-empty output is logged verbatim.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, command: &str) -> String {
        match execute(command).await {
            Ok(result) => {
                if !result.success {
                    debug!("Command exited with a failure status");
                }
                if !result.output.is_empty() {
                    self.log.append(&format!("Command output: {}", result.output));
                }
                result.output
            }
            Err(e) => {
                warn!("{}", e);
                self.log
                    .append(&format!("ERROR: Failed to execute command: {}", command));
                COMMAND_FAILED.to_string()
            }
        }
    }
}

/// Spawn `command` through the shell and wait for it
pub async fn execute(command: &str) -> Result<CommandOutput, CommandError> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(format!("exec 2>&1\n{}", command))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| CommandError::SpawnFailed {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    debug!(status = %output.status, "Command finished");

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }

    Ok(CommandOutput {
        output: text,
        success: output.status.success(),
    })
}

/// Run `command` discarding its output, returning only the exit status
///
/// The child is killed if the returned future is dropped before it exits.
pub async fn exit_status(command: &str) -> Result<ExitStatus, CommandError> {
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .kill_on_drop(true)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| CommandError::SpawnFailed {
            command: command.to_string(),
            reason: e.to_string(),
        })
}
