//! Bounded shell execution capability.
//!
//! `System.run_command` runs a shell command with a timeout and returns a
//! structured `{success, stdout, stderr}` result. Failures to spawn and
//! timeouts are reported inside the result rather than as capability
//! errors, so callers always get the same shape back.

use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tracing::debug;

use plexus_capabilities::{CapabilityError, CapabilityRegistry, FnCapability};

/// Structured result of a shell command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// True when the command exited with status zero.
    pub success: bool,
    /// Captured standard output, trimmed.
    pub stdout: String,
    /// Captured standard error, trimmed; also carries spawn/timeout notes.
    pub stderr: String,
}

impl CommandOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message.into(),
        }
    }

    /// Render as the capability's JSON payload.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "success": self.success,
            "stdout": self.stdout,
            "stderr": self.stderr,
        })
    }
}

/// Run `command` through the system shell, killing it after `timeout`.
#[must_use]
pub fn run_command(command: &str, timeout: Duration) -> CommandOutcome {
    debug!("Running shell command with {}s timeout", timeout.as_secs());

    let mut child = match Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return CommandOutcome::failure(format!("failed to spawn: {e}")),
    };

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let output = match child.wait_with_output() {
                    Ok(output) => output,
                    Err(e) => return CommandOutcome::failure(format!("failed to collect output: {e}")),
                };
                return CommandOutcome {
                    success: status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                };
            },
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return CommandOutcome::failure(format!(
                        "timed out after {}s",
                        timeout.as_secs()
                    ));
                }
                std::thread::sleep(Duration::from_millis(10));
            },
            Err(e) => {
                let _ = child.kill();
                return CommandOutcome::failure(format!("failed to poll: {e}"));
            },
        }
    }
}

/// Register `System.run_command` with the configured default timeout.
///
/// Callers may pass a smaller `timeout` argument (seconds); it is clamped
/// to the configured maximum.
pub(crate) fn register_shell_capability(registry: &CapabilityRegistry, max_timeout: Duration) {
    registry.register(
        "System",
        "run_command",
        Arc::new(FnCapability::new(move |args| {
            let command = args
                .get("command")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    CapabilityError::InvalidArguments("missing string field 'command'".into())
                })?;
            let timeout = args
                .get("timeout")
                .and_then(Value::as_u64)
                .map_or(max_timeout, Duration::from_secs)
                .min(max_timeout);
            Ok(run_command(command, timeout).to_json())
        })),
        false,
    );
}
