//! Configuration management for bootswitch.
//!
//! Loads settings from /etc/bootswitch/config.toml or uses defaults.

use crate::error::{BootSwitchError, Result};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/bootswitch/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/bootswitch/config.toml";

/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "PORT";

/// Platform selection in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformChoice {
    /// Pick from the build target
    #[default]
    Auto,
    Efi,
    Bcd,
}

impl PlatformChoice {
    pub fn resolve(&self) -> Platform {
        match self {
            Self::Auto => Platform::detect(),
            Self::Efi => Platform::Efi,
            Self::Bcd => Platform::Bcd,
        }
    }
}

impl std::str::FromStr for PlatformChoice {
    type Err = BootSwitchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "efi" | "efibootmgr" | "linux" => Ok(Self::Efi),
            "bcd" | "bcdedit" | "windows" => Ok(Self::Bcd),
            other => Err(BootSwitchError::Config(format!("unknown platform {:?}", other))),
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Address the web UI binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port for the web UI
    #[serde(default = "default_port")]
    pub port: u16,

    /// Which boot tool to drive
    #[serde(default)]
    pub platform: PlatformChoice,

    /// Where rename/hide preferences are stored (.json or .yaml)
    #[serde(default = "default_overrides_path")]
    pub overrides_path: PathBuf,

    /// Static assets (favicon etc.)
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8088
}

fn default_overrides_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("config.yaml")
    } else {
        PathBuf::from("/var/lib/bootswitch/overrides.json")
    }
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            platform: PlatformChoice::default(),
            overrides_path: default_overrides_path(),
            public_dir: default_public_dir(),
        }
    }
}

impl Config {
    /// Load config from the standard locations, falling back to defaults.
    /// `PORT` in the environment wins over the file.
    pub fn load() -> Self {
        let config = Self::load_from_path(CONFIG_PATH)
            .or_else(|_| Self::load_from_path(DEFAULT_CONFIG_PATH))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            });
        config.with_env_port(std::env::var(PORT_ENV).ok().as_deref())
    }

    /// Load config from specific path
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| BootSwitchError::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply a `PORT` value; unparsable values are ignored.
    pub fn with_env_port(mut self, port: Option<&str>) -> Self {
        if let Some(raw) = port {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => warn!("Ignoring invalid {}={:?}", PORT_ENV, raw),
            }
        }
        self
    }

    /// Directory holding the running executable.
    pub fn app_dir() -> Result<PathBuf> {
        let exe = std::env::current_exe()?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| BootSwitchError::Config(format!("{} has no parent directory", exe.display())))
    }

    /// Resolve relative `overrides_path` and `public_dir` against `base`.
    pub fn anchored_at(mut self, base: &Path) -> Self {
        if self.overrides_path.is_relative() {
            self.overrides_path = base.join(&self.overrides_path);
        }
        if self.public_dir.is_relative() {
            self.public_dir = base.join(&self.public_dir);
        }
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform.resolve()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
