//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod person;
pub mod transfer;

pub use backup::{handle_backup_command, BackupCommands};
pub use person::{handle_person_command, PersonCommands};
pub use transfer::{handle_export, handle_import};
