//! JSON file-based key-value store.
//!
//! Keeps every entry in memory and persists the whole map on each write using an
//! atomic write (write-to-temp + rename) so a crash never leaves a torn file.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "user": "{\"id\":\"u-1\",\"name\":\"Ada\"}",
//!     "userId": "u-1"
//!   }
//! }
//! ```

use crate::domain::error::{FeedError, Result};
use crate::storage::backend::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file [`KeyValueStore`].
///
/// The file is loaded once on creation. Writes go through immediately; a dirty
/// flag guards the final flush in `Drop` for writes whose save failed.
#[derive(Debug)]
pub struct JsonKeyValueStore {
    file_path: PathBuf,
    data: StoreData,
    dirty: bool,
}

impl JsonKeyValueStore {
    /// Creates or opens the store at `file_path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but contains invalid JSON
    /// - File permissions prevent reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use notifeed::storage::{JsonKeyValueStore, KeyValueStore};
    /// use std::path::PathBuf;
    ///
    /// let store = JsonKeyValueStore::new(PathBuf::from("/tmp/notifeed/storage.json"))?;
    /// let user = store.get("userId")?;
    /// # Ok::<(), notifeed::FeedError>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON key-value store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StoreData::default()
        };

        tracing::debug!(entry_count = data.entries.len(), "key-value store ready");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StoreData = serde_json::from_str(&contents)
            .map_err(|e| FeedError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(version = data.version, entries = data.entries.len(), "loaded key-value data");
        Ok(data)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| FeedError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "key-value store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("kv_set", key = %key).entered();

        self.data.entries.insert(key.to_string(), value.to_string());
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("kv_remove", key = %key).entered();

        if self.data.entries.remove(key).is_some() {
            self.dirty = true;
            self.save_to_file()?;
        }
        Ok(())
    }
}

impl Drop for JsonKeyValueStore {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save key-value store on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        {
            let mut store = JsonKeyValueStore::new(path.clone()).unwrap();
            store.set("userId", "u-1").unwrap();
            store.set("token", "abc").unwrap();
            store.remove("token").unwrap();
        }

        let reopened = JsonKeyValueStore::new(path).unwrap();
        assert_eq!(reopened.get("userId").unwrap().as_deref(), Some("u-1"));
        assert_eq!(reopened.get("token").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonKeyValueStore::new(path).unwrap_err();
        assert!(matches!(err, FeedError::Storage(_)));
    }
}
