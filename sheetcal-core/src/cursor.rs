//! Durable run cursor.
//!
//! The cursor is the next sheet row to look at. It lives in a small
//! key/value store that is handed in by the caller.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{SheetCalError, SheetCalResult};

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> SheetCalResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> SheetCalResult<()>;
}

/// A JSON object on disk, rewritten in full on every `set`.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> SheetCalResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            SheetCalError::Store(format!("Could not parse {}: {e}", self.path.display()))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> SheetCalResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> SheetCalResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(&entries)
            .map_err(|e| SheetCalError::Serialization(e.to_string()))?;

        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> SheetCalResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| SheetCalError::Store("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> SheetCalResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SheetCalResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The cursor under one key, bounded below by the first data row.
pub struct CursorStore<'a> {
    store: &'a dyn KeyValueStore,
    key: String,
    start_row: u32,
}

impl<'a> CursorStore<'a> {
    pub fn new(store: &'a dyn KeyValueStore, key: impl Into<String>, start_row: u32) -> Self {
        Self {
            store,
            key: key.into(),
            start_row,
        }
    }

    pub fn start_row(&self) -> u32 {
        self.start_row
    }

    /// The stored row, or `start_row` when nothing usable is stored.
    pub fn load(&self) -> SheetCalResult<u32> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(self.start_row);
        };

        match raw.trim().parse::<u32>() {
            Ok(row) if row >= self.start_row => Ok(row),
            Ok(row) => {
                log::warn!(
                    "Stored {} ({row}) is before the first data row, starting at {}",
                    self.key,
                    self.start_row
                );
                Ok(self.start_row)
            }
            Err(_) => {
                log::warn!(
                    "Stored {} '{raw}' is not a row number, starting at {}",
                    self.key,
                    self.start_row
                );
                Ok(self.start_row)
            }
        }
    }

    pub fn save(&self, row: u32) -> SheetCalResult<()> {
        self.store.set(&self.key, &row.to_string())
    }

    pub fn reset(&self) -> SheetCalResult<()> {
        self.save(self.start_row)
    }
}
