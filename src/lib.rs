//! Contact Registry - validated, searchable local contact storage
//!
//! This library keeps a list of personal contacts (name, birth date, phone,
//! email) in a local key-value store. Every write is validated, email and
//! phone numbers are kept unique, and each change is snapshotted so earlier
//! states can be restored. The collection can be exported to and imported
//! from checksummed JSON files.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `validation`: Field identifiers and their validators
//! - `models`: The contact record and its stored form
//! - `storage`: Key-value backing stores and the contact repository
//! - `backup`: Checksums and snapshot history
//! - `export` / `import`: JSON file exchange
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `config`: Configuration and path management
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use contact_registry::config::Settings;
//! use contact_registry::services::ContactService;
//! use contact_registry::storage::MemoryStore;
//!
//! let service = ContactService::new(Arc::new(MemoryStore::new()), &Settings::default());
//! service.load()?;
//! service.create("Ana Lima", "10/05/1995", "(21) 98888-7777", "ana@x.com")?;
//! assert_eq!(service.search_persons("ana")?.len(), 1);
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod validation;

pub use error::{RegistryError, RegistryResult};
