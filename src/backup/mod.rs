//! Backup system for the contact registry
//!
//! Keeps a rolling history of snapshots of the contact collection in the
//! backing store, each carrying a checksum that is verified on restore.
//!
//! # Snapshot Format
//!
//! The history is a JSON array, newest first, of:
//! - `id`: opaque snapshot id
//! - `timestamp`: when the snapshot was taken
//! - `data`: serialized contacts
//! - `version`: snapshot format version
//! - `checksum`: digest of `data`
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use contact_registry::backup::BackupManager;
//! use contact_registry::storage::MemoryStore;
//!
//! let manager = BackupManager::with_default_retention(Arc::new(MemoryStore::new()));
//! let snapshot = manager.create_backup(&records)?;
//! let restored = manager.restore_backup(&snapshot.id)?;
//! ```

pub mod checksum;
mod manager;

pub use checksum::{checksum, checksum_str, checksum_value};
pub use manager::{BackupInfo, BackupManager, BackupSnapshot, BACKUP_VERSION};
