//! Key-value backing stores
//!
//! The registry keeps its whole state in a handful of string values under
//! fixed keys. [`MemoryStore`] keeps them in a map; [`FileStore`] keeps one
//! `<key>.json` file per key in a directory. Both can be given a byte quota,
//! and exceeding it is reported as [`RegistryError::StorageQuota`].

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{RegistryError, RegistryResult};

use super::file_io::{read_optional, write_atomic};

/// Key holding the serialized contact collection
pub const CONTACTS_KEY: &str = "contacts";

/// Key holding the backup snapshot history
pub const BACKUPS_KEY: &str = "contacts_backups";

/// Key reserved for the front end's theme choice
pub const THEME_KEY: &str = "theme";

/// A string-valued persistent map
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> RegistryResult<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> RegistryResult<()>;

    /// Delete `key` if present
    fn remove(&self, key: &str) -> RegistryResult<()>;
}

/// In-memory store, optionally capped at a total number of bytes
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose keys and values together may not exceed `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently used by keys and values
    pub fn used_bytes(&self) -> RegistryResult<usize> {
        let entries = self.entries.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(entries.iter().map(|(k, v)| k.len() + v.len()).sum())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> RegistryResult<Option<String>> {
        let entries = self.entries.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RegistryResult<()> {
        let mut entries = self.entries.write().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(limit) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            check_quota(others + key.len() + value.len(), limit)?;
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RegistryResult<()> {
        let mut entries = self.entries.write().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: each key is a `<key>.json` file
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            quota_bytes: None,
        }
    }

    /// Cap the total size of the store's files
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    fn path_for(&self, key: &str) -> RegistryResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RegistryError::Storage(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Total size of every stored value except the one at `skip`
    fn used_bytes_except(&self, skip: &PathBuf) -> RegistryResult<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(RegistryError::Storage(format!(
                    "Failed to read {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        };

        let mut total = 0usize;
        for entry in entries {
            let entry = entry.map_err(|e| {
                RegistryError::Storage(format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if &path == skip || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let size = entry
                .metadata()
                .map_err(|e| RegistryError::Storage(format!("Failed to stat {}: {}", path.display(), e)))?
                .len();
            total += size as usize;
        }
        Ok(total)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> RegistryResult<Option<String>> {
        read_optional(self.path_for(key)?)
    }

    fn set(&self, key: &str, value: &str) -> RegistryResult<()> {
        let path = self.path_for(key)?;

        if let Some(limit) = self.quota_bytes {
            check_quota(self.used_bytes_except(&path)? + value.len(), limit)?;
        }

        write_atomic(&path, value.as_bytes())
    }

    fn remove(&self, key: &str) -> RegistryResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RegistryError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

fn check_quota(needed: usize, limit: usize) -> RegistryResult<()> {
    if needed > limit {
        return Err(RegistryError::StorageQuota(format!(
            "writing would use {} bytes, limit is {}",
            needed, limit
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get(CONTACTS_KEY).unwrap().is_none());

        store.set(CONTACTS_KEY, "[]").unwrap();
        assert_eq!(store.get(CONTACTS_KEY).unwrap().as_deref(), Some("[]"));

        store.remove(CONTACTS_KEY).unwrap();
        assert!(store.get(CONTACTS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(20);
        store.set("k", "0123456789").unwrap();

        // Replacing a value only counts the new size
        store.set("k", "0123456789abcdef").unwrap();

        let err = store.set("other", "0123456789").unwrap_err();
        assert!(matches!(err, RegistryError::StorageQuota(_)));
        assert!(store.get("other").unwrap().is_none());
        assert_eq!(store.used_bytes().unwrap(), 17);
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("data"));

        assert!(store.get(BACKUPS_KEY).unwrap().is_none());
        store.set(BACKUPS_KEY, "[1,2,3]").unwrap();
        assert!(temp_dir.path().join("data").join("contacts_backups.json").exists());
        assert_eq!(store.get(BACKUPS_KEY).unwrap().as_deref(), Some("[1,2,3]"));

        store.remove(BACKUPS_KEY).unwrap();
        store.remove(BACKUPS_KEY).unwrap();
        assert!(store.get(BACKUPS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf());

        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_file_store_quota() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf()).with_quota(10);

        store.set(THEME_KEY, "\"dark\"").unwrap();
        let err = store.set(CONTACTS_KEY, "[\"too long\"]").unwrap_err();
        assert!(matches!(err, RegistryError::StorageQuota(_)));
        assert!(store.get(CONTACTS_KEY).unwrap().is_none());
    }
}
