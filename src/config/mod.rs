//! Configuration module for the contact registry
//!
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::RegistryPaths;
pub use settings::Settings;
