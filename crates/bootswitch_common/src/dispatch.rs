//! Boot dispatch: "boot this entry next" followed by an immediate restart.
//!
//! A boot request moves Validating -> Rejected | Dispatched, and a
//! dispatched request ends Succeeded | Failed. Rejection happens before
//! any command line is built. A failed dispatch is reported as-is and
//! never retried.

use crate::command_exec::CommandRunner;
use crate::error::Result;
use crate::overrides::Overrides;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Result of a dispatched boot request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BootOutcome {
    /// Reboot scheduled; the host is going down, nothing further is awaited
    Succeeded { target_label: String },
    /// Boot selection or restart command failed
    Failed {
        target_label: String,
        diagnostic: String,
    },
}

impl BootOutcome {
    pub fn target_label(&self) -> &str {
        match self {
            Self::Succeeded { target_label } | Self::Failed { target_label, .. } => target_label,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Failed { diagnostic, .. } => Some(diagnostic),
            Self::Succeeded { .. } => None,
        }
    }
}

/// Builds and runs the platform boot command for one entry.
pub struct Dispatcher<'a, R: CommandRunner + ?Sized> {
    platform: Platform,
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> Dispatcher<'a, R> {
    pub fn new(platform: Platform, runner: &'a R) -> Self {
        Self { platform, runner }
    }

    /// Validate `raw_id`, then dispatch. `Err` means the request was
    /// rejected and nothing ran.
    pub async fn boot(&self, raw_id: &str, overrides: &Overrides) -> Result<BootOutcome> {
        let id = self.platform.normalize_id(raw_id)?;

        let target_label = overrides
            .label_for(&id)
            .map(str::to_string)
            .unwrap_or_else(|| self.platform.fallback_target_label(&id));

        let command = self.platform.boot_command(&id);
        info!("  Dispatching boot to {} ({}): {}", target_label, id, command);

        let output = self.runner.run(&command).await;
        if output.is_success() {
            info!("  Reboot into {} scheduled", target_label);
            return Ok(BootOutcome::Succeeded { target_label });
        }

        let diagnostic = output.diagnostic();
        error!("  Boot into {} failed: {}", target_label, diagnostic.trim());
        Ok(BootOutcome::Failed {
            target_label,
            diagnostic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_exec::{CommandOutput, FakeRunner};

    #[tokio::test]
    async fn test_boot_success_uses_fallback_label() {
        let runner = FakeRunner::new();
        let outcome = Dispatcher::new(Platform::Efi, &runner)
            .boot("000a", &Overrides::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BootOutcome::Succeeded {
                target_label: "BootNum 000A".to_string()
            }
        );
        assert_eq!(runner.calls(), vec!["efibootmgr -n 000A && reboot"]);
    }

    #[tokio::test]
    async fn test_boot_failure_reports_stderr() {
        let runner = FakeRunner::new().with_response(
            "efibootmgr -n 0002 && reboot",
            CommandOutput::failed("Boot option not found", "Command failed: exit status: 1"),
        );
        let outcome = Dispatcher::new(Platform::Efi, &runner)
            .boot("0002", &Overrides::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            BootOutcome::Failed {
                target_label: "BootNum 0002".to_string(),
                diagnostic: "Boot option not found".to_string(),
            }
        );
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_boot_uses_override_label() {
        let mut overrides = Overrides::new();
        overrides.set_label("{AAAA-0001}", "Network");
        let runner = FakeRunner::new();

        let outcome = Dispatcher::new(Platform::Bcd, &runner)
            .boot(" {AAAA-0001} ", &overrides)
            .await
            .unwrap();
        assert_eq!(outcome.target_label(), "Network");
        assert_eq!(
            runner.calls(),
            vec!["bcdedit /set {fwbootmgr} bootsequence {AAAA-0001} && shutdown /r /t 0"]
        );
    }

    #[tokio::test]
    async fn test_bcd_fallback_label_is_guid() {
        let runner = FakeRunner::new();
        let outcome = Dispatcher::new(Platform::Bcd, &runner)
            .boot("{AAAA-0001}", &Overrides::new())
            .await
            .unwrap();
        assert_eq!(outcome.target_label(), "{AAAA-0001}");
    }

    #[tokio::test]
    async fn test_invalid_id_rejected_before_command() {
        let runner = FakeRunner::new();
        let dispatcher = Dispatcher::new(Platform::Efi, &runner);

        for bad in ["", "12345", "0001; rm -rf /", "{AAAA-0001}"] {
            let err = dispatcher.boot(bad, &Overrides::new()).await.unwrap_err();
            assert!(err.is_validation());
        }
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_outcome_accessors() {
        let failed = BootOutcome::Failed {
            target_label: "Arch".to_string(),
            diagnostic: "denied".to_string(),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.diagnostic(), Some("denied"));
        assert_eq!(failed.target_label(), "Arch");
    }
}
