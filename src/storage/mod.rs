//! Storage layer for the contact registry
//!
//! A [`KeyValueStore`] holds the serialized state; the [`PersonRepository`]
//! owns the live collection on top of it. File-backed stores write atomically.

pub mod file_io;
pub mod people;
pub mod store;

pub use file_io::{read_optional, write_atomic, write_json_atomic};
pub use people::PersonRepository;
pub use store::{FileStore, KeyValueStore, MemoryStore, BACKUPS_KEY, CONTACTS_KEY, THEME_KEY};
