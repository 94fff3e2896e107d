//! Bootswitch Daemon - pick the next firmware boot entry from a web page
//!
//! Lists firmware boot entries, lets the operator rename or hide them and
//! reboots into the chosen one.

use anyhow::Result;
use bootswitch_common::{BootSwitch, Config, FileOverrideStore, Platform, PlatformChoice, ShellRunner};
use bootswitchd::server::{self, AppState};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bootswitchd", version, about = "Web UI to choose the next firmware boot entry")]
struct Args {
    /// Config file (default: /etc/bootswitch/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port for the web UI
    #[arg(long)]
    port: Option<u16>,

    /// Boot tool to drive: efi, bcd or auto
    #[arg(long)]
    platform: Option<PlatformChoice>,

    /// Override document (.json or .yaml)
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Directory with static assets
    #[arg(long)]
    public_dir: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_path(path)?
                .with_env_port(std::env::var(bootswitch_common::config::PORT_ENV).ok().as_deref()),
            None => Config::load(),
        };
        if let Some(platform) = self.platform {
            config.platform = platform;
        }
        // Scheduled Windows starts run from System32; keep files beside the binary
        if config.platform() == Platform::Bcd {
            match Config::app_dir() {
                Ok(dir) => config = config.anchored_at(&dir),
                Err(e) => warn!("  Could not locate executable directory: {}", e),
            }
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(path) = self.overrides {
            config.overrides_path = path;
        }
        if let Some(dir) = self.public_dir {
            config.public_dir = dir;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Bootswitch Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Args::parse().into_config()?;
    let platform = config.platform();
    info!("  Platform: {} ({})", platform, platform.enumerate_command());

    let store = FileOverrideStore::new(&config.overrides_path);
    if let Err(e) = store.ensure_exists() {
        warn!("  Could not create {}: {}", store.path().display(), e);
    }
    if let Err(e) = server::prepare_public_dir(&config.public_dir) {
        warn!("  Could not prepare {}: {}", config.public_dir.display(), e);
    }

    let switch = BootSwitch::new(platform, ShellRunner::host(), store);
    server::run(AppState::new(switch), &config.listen_addr(), &config.public_dir).await
}
