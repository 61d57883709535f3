//! Service layer for the contact registry
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, uniqueness, backups and auditing.

pub mod contacts;

pub use contacts::ContactService;
