//! Command execution layer.
//!
//! Runs a full shell command line and captures stdout, stderr and the
//! failure reason WITHOUT interpretation. A non-zero exit is reported in
//! `CommandOutput::error`, never as an `Err`.
//!
//! Production code uses `ShellRunner`. Tests use `FakeRunner` with
//! pre-configured responses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::process::Command;
use tracing::{debug, error};

/// Fallback when a failed command left no diagnostic at all.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Captured result of one command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Set when the command could not be spawned or exited non-zero
    pub error: Option<String>,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    pub fn failed(stderr: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Text shown to the operator for a failure: stderr, else the error
    /// message, else a generic marker.
    pub fn diagnostic(&self) -> String {
        if !self.stderr.trim().is_empty() {
            return self.stderr.clone();
        }
        match self.error.as_deref() {
            Some(msg) if !msg.trim().is_empty() => msg.to_string(),
            _ => UNKNOWN_ERROR.to_string(),
        }
    }
}

/// Runs command lines on behalf of the core.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> CommandOutput;
}

/// Runs command lines through the host shell (`sh -c` / `cmd /C`).
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    flag: String,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            flag: flag.into(),
        }
    }

    /// Shell of the host this binary was built for.
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::new("cmd", "/C")
        } else {
            Self::new("sh", "-c")
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::host()
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> CommandOutput {
        debug!("  Executing: {} {} {:?}", self.shell, self.flag, command);

        let output = Command::new(&self.shell)
            .arg(&self.flag)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                error!("  Failed to spawn {:?}: {}", command, e);
                return CommandOutput::failed("", format!("Failed to execute command: {}", e));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        debug!("  STDOUT:\n{}", stdout);

        if output.status.success() {
            return CommandOutput {
                stdout,
                stderr,
                error: None,
            };
        }

        error!("  Command {:?} failed ({})", command, output.status);
        error!("  STDERR:\n{}", stderr);
        CommandOutput {
            stdout,
            stderr,
            error: Some(format!("Command failed: {}", output.status)),
        }
    }
}

/// Canned-response runner. Unknown commands succeed with empty output.
#[derive(Debug, Default)]
pub struct FakeRunner {
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `command` with `output`.
    pub fn with_response(mut self, command: impl Into<String>, output: CommandOutput) -> Self {
        self.responses.insert(command.into(), output);
        self
    }

    /// Every command line seen so far, in order.
    pub fn calls(&self) -> Vec<String> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, command: &str) -> CommandOutput {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.to_string());
        }
        self.responses.get(command).cloned().unwrap_or_default()
    }
}
