//! Asynchronous key-value persistence.
//!
//! Settings and drafts live in an external store that is only ever reached
//! asynchronously. Callers treat every store failure as non-fatal: the
//! helpers here log and carry on with in-memory values.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::settings::{ReaderSettings, SETTINGS_KEY};
use crate::{ReaderError, Result};

/// An asynchronous string-keyed store of JSON values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HashMap<String, Value>) -> T) -> Result<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ReaderError::StoreError("memory store lock poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}

/// Store backed by a single JSON object on disk.
///
/// A missing file reads as an empty store; the file and its parent
/// directory are created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock: std::sync::Arc<tokio::sync::Mutex<()>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Default::default() }
    }

    /// `<config dir>/readmode/<name>.json`, if the platform has a config dir.
    pub fn default_location(name: &str) -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("readmode").join(format!("{}.json", name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<Map<String, Value>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(ReaderError::StoreError(format!("{} does not hold a JSON object", self.path.display()))),
        }
    }

    async fn write_map(&self, map: Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string_pretty(&Value::Object(map))?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value);
        self.write_map(map).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(map).await?;
        }
        Ok(())
    }
}

/// Loads settings merged over the defaults. Failures are logged and the
/// defaults returned.
pub async fn load_settings(store: &dyn KeyValueStore) -> ReaderSettings {
    match store.get(SETTINGS_KEY).await {
        Ok(Some(stored)) => ReaderSettings::merge(&stored),
        Ok(None) => ReaderSettings::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load settings");
            ReaderSettings::default()
        }
    }
}

/// Persists settings. Returns whether the write succeeded; failures are logged.
pub async fn save_settings(store: &dyn KeyValueStore, settings: &ReaderSettings) -> bool {
    let value = match serde_json::to_value(settings) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode settings");
            return false;
        }
    };

    match store.set(SETTINGS_KEY, value).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "failed to save settings");
            false
        }
    }
}
