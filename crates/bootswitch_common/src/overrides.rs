//! Persisted user overrides (custom label, hidden flag) keyed by entry id.
//!
//! The whole document is read and replaced on every change. Concurrent
//! writers race and the last one wins; the store is edited by a single
//! local operator.
//!
//! Load never fails: a missing or corrupt document reads as empty, and a
//! malformed entry is skipped while the others are kept.

use crate::error::{BootSwitchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// User customization for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// Mapping from entry id to override. Ids of entries no longer present in
/// the firmware menu are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    entries: BTreeMap<String, Override>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Override> {
        self.entries.get(id)
    }

    /// Custom label, ignoring blank values.
    pub fn label_for(&self, id: &str) -> Option<&str> {
        self.get(id)
            .and_then(|o| o.label.as_deref())
            .filter(|label| !label.trim().is_empty())
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.get(id).and_then(|o| o.hidden).unwrap_or(false)
    }

    pub fn set_label(&mut self, id: &str, label: impl Into<String>) {
        self.entries.entry(id.to_string()).or_default().label = Some(label.into());
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) {
        self.entries.entry(id.to_string()).or_default().hidden = Some(hidden);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Override)> {
        self.entries.iter()
    }
}

impl FromIterator<(String, Override)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (String, Override)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Load/save contract for the override document.
pub trait OverrideStore: Send + Sync {
    /// Current overrides; empty when nothing usable is persisted.
    fn load(&self) -> Overrides;

    /// Replace the persisted document.
    fn save(&self, overrides: &Overrides) -> Result<()>;
}

/// On-disk layout always written.
#[derive(Serialize)]
struct NormalizedDocument<'a> {
    entries: &'a BTreeMap<String, Override>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }

    /// Accepts `{entries: {id: override}}` or the legacy flat `{id: override}`.
    /// Fails only when the document or its `entries` value is not a mapping.
    fn parse(&self, content: &str) -> std::result::Result<Overrides, String> {
        match self {
            Self::Json => {
                let top: BTreeMap<String, serde_json::Value> =
                    serde_json::from_str(content).map_err(|e| e.to_string())?;
                collect_entries(
                    top,
                    |v| serde_json::from_value(v).map_err(|e| e.to_string()),
                    |v| serde_json::from_value(v).map_err(|e| e.to_string()),
                )
            }
            Self::Yaml => {
                let top: BTreeMap<String, serde_yaml::Value> =
                    serde_yaml::from_str(content).map_err(|e| e.to_string())?;
                collect_entries(
                    top,
                    |v| serde_yaml::from_value(v).map_err(|e| e.to_string()),
                    |v| serde_yaml::from_value(v).map_err(|e| e.to_string()),
                )
            }
        }
    }

    fn render(&self, doc: &NormalizedDocument<'_>) -> Result<String> {
        let rendered = match self {
            Self::Json => serde_json::to_string_pretty(doc).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(doc).map_err(|e| e.to_string()),
        };
        rendered.map_err(|e| BootSwitchError::Persistence(format!("Failed to serialize overrides: {}", e)))
    }
}

/// Decode entries one by one so a single malformed override is dropped
/// without losing the rest.
fn collect_entries<V>(
    mut top: BTreeMap<String, V>,
    as_map: impl Fn(V) -> std::result::Result<BTreeMap<String, V>, String>,
    as_override: impl Fn(V) -> std::result::Result<Override, String>,
) -> std::result::Result<Overrides, String> {
    let raw = match top.remove("entries") {
        Some(entries) => as_map(entries).map_err(|e| format!("entries: {}", e))?,
        None => top,
    };

    let mut overrides = Overrides::new();
    for (id, value) in raw {
        match as_override(value) {
            Ok(entry) => {
                overrides.entries.insert(id, entry);
            }
            Err(e) => warn!("Skipping malformed override for {}: {}", id, e),
        }
    }
    Ok(overrides)
}

/// Override document at a fixed path. `.yaml`/`.yml` files are YAML,
/// everything else is JSON.
#[derive(Debug, Clone)]
pub struct FileOverrideStore {
    path: PathBuf,
    format: DocumentFormat,
}

impl FileOverrideStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = DocumentFormat::for_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty document if none exists yet.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        self.save(&Overrides::new())?;
        info!("Created empty override document at {}", self.path.display());
        Ok(())
    }
}

impl OverrideStore for FileOverrideStore {
    fn load(&self) -> Overrides {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No override document at {}", self.path.display());
                return Overrides::new();
            }
            Err(e) => {
                warn!("Failed to read overrides from {}: {}. Using none.", self.path.display(), e);
                return Overrides::new();
            }
        };

        match self.format.parse(&content) {
            Ok(overrides) => overrides,
            Err(e) => {
                warn!("Failed to parse overrides in {}: {}. Using none.", self.path.display(), e);
                Overrides::new()
            }
        }
    }

    fn save(&self, overrides: &Overrides) -> Result<()> {
        let content = self.format.render(&NormalizedDocument {
            entries: &overrides.entries,
        })?;

        let persist_err = |what: &str, path: &Path, e: std::io::Error| {
            BootSwitchError::Persistence(format!("Failed to {} {}: {}", what, path.display(), e))
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| persist_err("create", dir, e))?;

        // Atomic write; each save gets its own temp file
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| persist_err("create temp file in", dir, e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| persist_err("write", temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| persist_err("replace", &self.path, e.error))?;

        debug!("Saved {} overrides to {}", overrides.len(), self.path.display());
        Ok(())
    }
}

/// In-process store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryOverrideStore {
    inner: Mutex<Overrides>,
}

impl MemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: Overrides) -> Self {
        Self {
            inner: Mutex::new(overrides),
        }
    }
}

impl OverrideStore for MemoryOverrideStore {
    fn load(&self) -> Overrides {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn save(&self, overrides: &Overrides) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| BootSwitchError::Persistence("override store lock poisoned".to_string()))?;
        *guard = overrides.clone();
        Ok(())
    }
}
