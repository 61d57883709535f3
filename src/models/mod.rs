//! Core data models for the contact registry

pub mod ids;
pub mod person;

pub use ids::{BackupId, PersonId};
pub use person::{Person, PersonRecord, PersonUpdate};
