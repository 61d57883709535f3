//! Audit logging for the contact registry
//!
//! Every change to the contact list is appended to an audit log as one JSON
//! line, including before/after values for updates.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
