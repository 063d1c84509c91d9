use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::state::Settings;

pub const STORE_FILE: &str = "store.json";
pub const SETTINGS_KEY: &str = "settings";
pub const HISTORY_KEY: &str = "textHistory";

/// A single durable string slot.
pub trait Storage {
    fn read(&self) -> Result<Option<String>>;
    /// Replaces the previous content entirely.
    fn write(&self, payload: &str) -> Result<()>;
}

/// Key/value store persisted as one JSON object on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store; so is a
    /// file that is not a JSON object, whatever bytes it holds.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match std::fs::read(&path) {
            Ok(data) => Some(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read store {}", path.display()))
            }
        };

        let entries = match data {
            Some(data) => match serde_json::from_slice::<BTreeMap<String, Value>>(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Store {} is corrupt: {}. Starting empty.", path.display(), e);
                    BTreeMap::new()
                }
            },
            None => {
                tracing::info!("No store at {}. Starting empty.", path.display());
                BTreeMap::new()
            }
        };

        Ok(Self { path, entries })
    }

    pub fn open_in(dir: &Path) -> Result<Self> {
        Self::open(dir.join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Writes a temp sibling and renames it over the store file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create store directory")?;
        }
        let data = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

pub type SharedStore = Arc<Mutex<JsonFileStore>>;

/// One key of a shared [`JsonFileStore`], seen as a [`Storage`] slot.
///
/// The payload is kept as a JSON string value, so the store holds the
/// serialized text exactly as it was written.
#[derive(Debug, Clone)]
pub struct StoreKey {
    store: SharedStore,
    key: String,
}

impl StoreKey {
    pub fn new(store: SharedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl Storage for StoreKey {
    fn read(&self) -> Result<Option<String>> {
        let store = self
            .store
            .lock()
            .map_err(|_| anyhow::anyhow!("Store lock poisoned"))?;
        Ok(store.get(&self.key).map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        }))
    }

    fn write(&self, payload: &str) -> Result<()> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| anyhow::anyhow!("Store lock poisoned"))?;
        store.set(self.key.clone(), Value::String(payload.to_string()));
        store.save()
    }
}

/// In-process storage slot, shareable between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("Storage lock poisoned"))?;
        Ok(slot.clone())
    }

    fn write(&self, payload: &str) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("Storage lock poisoned"))?;
        *slot = Some(payload.to_string());
        Ok(())
    }
}

/// Directory holding the store file when none is given.
pub fn default_data_dir() -> Result<PathBuf> {
    let data = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot find the user data directory"))?;
    Ok(data.join("TextUtils"))
}

pub fn load_settings(store: &JsonFileStore) -> Settings {
    match store.get(SETTINGS_KEY) {
        Some(value) => match serde_json::from_value::<Settings>(value) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to deserialize stored settings: {}. Using defaults.", e);
                Settings::default()
            }
        },
        None => {
            tracing::info!("No stored settings found. Using defaults.");
            Settings::default()
        }
    }
}

pub fn save_settings(store: &mut JsonFileStore, settings: &Settings) {
    match serde_json::to_value(settings) {
        Ok(value) => {
            store.set(SETTINGS_KEY, value);
            if let Err(e) = store.save() {
                tracing::error!("Failed to save settings store to disk: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("Failed to serialize settings: {}", e);
        }
    }
}
