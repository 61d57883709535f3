//! Backup manager for the contact registry
//!
//! Keeps a short history of checksummed snapshots of the collection under
//! [`BACKUPS_KEY`], newest first. When the history is full the oldest
//! snapshot is evicted.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::checksum::checksum;
use crate::config::settings::DEFAULT_MAX_BACKUPS;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{BackupId, PersonRecord};
use crate::storage::{KeyValueStore, BACKUPS_KEY};

/// Snapshot format version
pub const BACKUP_VERSION: &str = "1.0";

/// A checksummed copy of the whole collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSnapshot {
    pub id: BackupId,
    pub timestamp: DateTime<Utc>,
    pub data: Vec<PersonRecord>,
    pub version: String,
    pub checksum: String,
}

/// Metadata about a snapshot, for listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub id: BackupId,
    pub timestamp: DateTime<Utc>,
    pub record_count: usize,
    pub checksum: String,
}

impl From<&BackupSnapshot> for BackupInfo {
    fn from(snapshot: &BackupSnapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            timestamp: snapshot.timestamp,
            record_count: snapshot.data.len(),
            checksum: snapshot.checksum.clone(),
        }
    }
}

/// Manages snapshot creation, retention and restore
pub struct BackupManager {
    store: Arc<dyn KeyValueStore>,
    max_backups: usize,
    history: RwLock<Vec<BackupSnapshot>>,
}

impl BackupManager {
    /// Create a manager keeping at most `max_backups` snapshots
    pub fn new(store: Arc<dyn KeyValueStore>, max_backups: usize) -> Self {
        Self {
            store,
            max_backups: max_backups.max(1),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Manager with the default retention of five snapshots
    pub fn with_default_retention(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, DEFAULT_MAX_BACKUPS)
    }

    /// Load the snapshot history from the store
    ///
    /// An unreadable history is dropped from memory (the store is left as is)
    /// and reported as a storage error.
    pub fn load(&self) -> RegistryResult<usize> {
        let raw = self.store.get(BACKUPS_KEY)?;
        let parsed = match raw {
            None => Ok(Vec::new()),
            Some(text) => serde_json::from_str::<Vec<BackupSnapshot>>(&text),
        };

        let mut history = self.history.write().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match parsed {
            Ok(mut snapshots) => {
                snapshots.truncate(self.max_backups);
                *history = snapshots;
                Ok(history.len())
            }
            Err(e) => {
                history.clear();
                warn!("backup history could not be parsed, ignoring it: {}", e);
                Err(RegistryError::Storage(format!(
                    "Failed to parse backup history: {}",
                    e
                )))
            }
        }
    }

    /// Snapshot `data`, newest first, evicting the oldest beyond the limit
    pub fn create_backup(&self, data: &[PersonRecord]) -> RegistryResult<BackupSnapshot> {
        let snapshot = BackupSnapshot {
            id: BackupId::new(),
            timestamp: Utc::now(),
            data: data.to_vec(),
            version: BACKUP_VERSION.to_string(),
            checksum: checksum(data)?,
        };

        let mut history = self.history.write().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let mut updated = Vec::with_capacity(self.max_backups);
        updated.push(snapshot.clone());
        updated.extend(history.iter().take(self.max_backups - 1).cloned());

        let json = serde_json::to_string(&updated)
            .map_err(|e| RegistryError::unknown("Failed to serialize backup history", e))?;
        self.store.set(BACKUPS_KEY, &json)?;

        let evicted = history.len() + 1 - updated.len();
        *history = updated;

        info!(
            "created backup {} with {} contacts (checksum {})",
            snapshot.id,
            snapshot.data.len(),
            snapshot.checksum
        );
        if evicted > 0 {
            debug!("evicted {} old backup(s)", evicted);
        }

        Ok(snapshot)
    }

    /// Return a snapshot's data after verifying its checksum
    pub fn restore_backup(&self, id: &BackupId) -> RegistryResult<Vec<PersonRecord>> {
        let snapshot = self
            .get_backup(id)?
            .ok_or_else(|| RegistryError::backup_not_found(id.to_string()))?;

        let actual = checksum(&snapshot.data)?;
        if actual != snapshot.checksum {
            warn!(
                "backup {} failed verification: expected {}, got {}",
                id, snapshot.checksum, actual
            );
            return Err(RegistryError::Corruption(format!(
                "backup {} checksum mismatch (expected {}, got {})",
                id, snapshot.checksum, actual
            )));
        }

        Ok(snapshot.data)
    }

    /// A snapshot by id
    pub fn get_backup(&self, id: &BackupId) -> RegistryResult<Option<BackupSnapshot>> {
        let history = self.history.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(history.iter().find(|s| &s.id == id).cloned())
    }

    /// All snapshots, newest first
    pub fn list_backups(&self) -> RegistryResult<Vec<BackupInfo>> {
        let history = self.history.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(history.iter().map(BackupInfo::from).collect())
    }

    /// The most recent snapshot
    pub fn get_latest_backup(&self) -> RegistryResult<Option<BackupInfo>> {
        let history = self.history.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(history.first().map(BackupInfo::from))
    }

    /// Checksum of the most recent snapshot
    pub fn latest_checksum(&self) -> RegistryResult<Option<String>> {
        Ok(self.get_latest_backup()?.map(|info| info.checksum))
    }

    /// Copy of the full history, newest first
    pub(crate) fn snapshots(&self) -> RegistryResult<Vec<BackupSnapshot>> {
        let history = self.history.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(history.clone())
    }

    /// Put back a history taken with [`BackupManager::snapshots`]
    ///
    /// Does nothing if the history has not changed since.
    pub(crate) fn reset_history(&self, snapshots: Vec<BackupSnapshot>) -> RegistryResult<()> {
        let mut history = self.history.write().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        if *history == snapshots {
            return Ok(());
        }

        if snapshots.is_empty() {
            self.store.remove(BACKUPS_KEY)?;
        } else {
            let json = serde_json::to_string(&snapshots)
                .map_err(|e| RegistryError::unknown("Failed to serialize backup history", e))?;
            self.store.set(BACKUPS_KEY, &json)?;
        }

        debug!("backup history reset to {} snapshot(s)", snapshots.len());
        *history = snapshots;
        Ok(())
    }
}
