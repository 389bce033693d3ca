//! Persisted Preferences
//! Durable string key/value storage shared with the host application.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Could not determine data directory")]
    NoDataDir,
}

/// Durable string key/value storage surviving process restarts.
///
/// The host application decides where values actually live (shared
/// preferences on mobile, a JSON file on desktop). Writes are
/// last-value-wins; there are no transactions.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// File-backed store: a flat JSON map, loaded and saved per operation.
pub struct FilePrefs {
    path: PathBuf,
}

impl FilePrefs {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Store at the platform data directory, e.g. ~/.local/share/PerkDeck/prefs.json
    pub fn default_location() -> Result<Self, PrefsError> {
        let data_dir = dirs::data_dir().ok_or(PrefsError::NoDataDir)?;
        Ok(Self {
            path: data_dir.join("PerkDeck").join("prefs.json"),
        })
    }

    fn load(&self) -> Result<PrefsFile, PrefsError> {
        if !self.path.exists() {
            return Ok(PrefsFile::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, prefs: &PrefsFile) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(prefs)?;

        // Write to temp file first, then rename (atomic)
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(prefs) => prefs.entries.get(key).cloned(),
            Err(e) => {
                tracing::warn!("failed to read preferences: {}", e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut prefs = self.load()?;
        prefs.entries.insert(key.to_string(), value.to_string());
        self.save(&prefs)
    }
}

/// In-memory store for tests and embedded host bridges.
#[derive(Default)]
pub struct MemoryPrefs {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
