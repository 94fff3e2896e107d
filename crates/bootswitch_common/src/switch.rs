//! Action facade: list, rename, hide/unhide, boot.
//!
//! Every call re-reads live tool output and the override document; nothing
//! is cached between requests.

use crate::command_exec::CommandRunner;
use crate::dispatch::{BootOutcome, Dispatcher};
use crate::error::{BootSwitchError, Result};
use crate::overrides::OverrideStore;
use crate::parsers::parse_listing;
use crate::platform::Platform;
use crate::reconcile::{reconcile, BootView};
use std::sync::Arc;
use tracing::{error, info};

/// Platform, command runner and override store wired together.
pub struct BootSwitch<R, S> {
    platform: Platform,
    runner: Arc<R>,
    store: Arc<S>,
}

impl<R, S> Clone for BootSwitch<R, S> {
    fn clone(&self) -> Self {
        Self {
            platform: self.platform,
            runner: Arc::clone(&self.runner),
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: CommandRunner, S: OverrideStore> BootSwitch<R, S> {
    pub fn new(platform: Platform, runner: R, store: S) -> Self {
        Self {
            platform,
            runner: Arc::new(runner),
            store: Arc::new(store),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Enumerate firmware entries and merge them with the overrides.
    pub async fn list(&self) -> Result<BootView> {
        let command = self.platform.enumerate_command();
        let output = self.runner.run(command).await;

        if !output.is_success() {
            let diagnostic = output.diagnostic();
            error!("  {} failed: {}", command, diagnostic.trim());
            return Err(BootSwitchError::ToolExecution {
                command: command.to_string(),
                diagnostic,
            });
        }

        let list = parse_listing(self.platform, &output.stdout);
        let overrides = self.store.load();
        Ok(reconcile(self.platform, &list, &overrides))
    }

    /// Set a custom label. Blank labels and malformed ids leave the store
    /// untouched.
    pub fn rename(&self, raw_id: &str, label: &str) -> Result<()> {
        let id = self.platform.normalize_id(raw_id)?;
        let label = label.trim();
        info!("  rename {} -> {:?}", id, label);

        if label.is_empty() {
            return Err(BootSwitchError::InvalidLabel(id));
        }

        let mut overrides = self.store.load();
        overrides.set_label(&id, label);
        self.store.save(&overrides)
    }

    /// Hide or unhide an entry. The custom label, if any, is kept.
    pub fn set_hidden(&self, raw_id: &str, hidden: bool) -> Result<()> {
        let id = self.platform.normalize_id(raw_id)?;
        info!("  hide {} hidden={}", id, hidden);

        let mut overrides = self.store.load();
        overrides.set_hidden(&id, hidden);
        self.store.save(&overrides)
    }

    /// Select `raw_id` as next boot and restart.
    pub async fn boot(&self, raw_id: &str) -> Result<BootOutcome> {
        let overrides = self.store.load();
        Dispatcher::new(self.platform, self.runner.as_ref())
            .boot(raw_id, &overrides)
            .await
    }
}
