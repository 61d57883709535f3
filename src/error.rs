//! Custom error types for the contact registry
//!
//! This module defines the error hierarchy for the registry using thiserror.
//! `Display` carries diagnostic detail; [`RegistryError::user_message`] is the
//! text meant for the person at the keyboard.

use thiserror::Error;

use crate::validation::FieldError;

/// The main error type for registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A record failed field validation
    #[error("Validation error: {}", join_field_errors(.errors))]
    Validation { errors: Vec<FieldError> },

    /// Another record already uses this email or phone
    #[error("Duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Generic backing-store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Backing store ran out of space
    #[error("Storage quota exceeded: {0}")]
    StorageQuota(String),

    /// Checksum mismatch on restore or import
    #[error("Data corruption detected: {0}")]
    Corruption(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Anything unexpected, with the original cause attached
    #[error("Unexpected error: {message}")]
    Unknown {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RegistryError {
    /// Create a "not found" error for a person looked up by position
    pub fn person_index_not_found(index: usize) -> Self {
        Self::NotFound {
            entity_type: "Person",
            identifier: format!("index {}", index),
        }
    }

    /// Create a "not found" error for a person looked up by id
    pub fn person_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Person",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Wrap an unexpected failure
    pub fn unknown<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unknown {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a duplicate error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Field errors carried by a validation error (empty for other kinds)
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation { errors } => errors,
            _ => &[],
        }
    }

    /// Message suitable for showing to the user, without internal detail
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { errors } => {
                let lines: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                format!("Please fix the following: {}", lines.join("; "))
            }
            Self::Duplicate { field, .. } => {
                format!("A contact with this {} already exists.", field)
            }
            Self::NotFound { entity_type, .. } => {
                format!("{} not found.", entity_type)
            }
            Self::StorageQuota(_) => {
                "Storage is full. Delete some contacts or old backups and try again.".to_string()
            }
            Self::Storage(_) | Self::Io(_) => {
                "Could not access saved data. Please try again.".to_string()
            }
            Self::Corruption(_) => {
                "The data appears to be corrupted and was not loaded.".to_string()
            }
            Self::Import(msg) => format!("Import failed: {}", msg),
            Self::Export(_) => "Export failed. Please try again.".to_string(),
            Self::Config(_) => "The configuration could not be read.".to_string(),
            Self::Json(_) => "The data is not valid JSON.".to_string(),
            Self::Unknown { .. } => "An unexpected error occurred.".to_string(),
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Field;

    #[test]
    fn test_error_display() {
        let err = RegistryError::Storage("disk unplugged".into());
        assert_eq!(err.to_string(), "Storage error: disk unplugged");
    }

    #[test]
    fn test_not_found_error() {
        let err = RegistryError::person_index_not_found(7);
        assert_eq!(err.to_string(), "Person not found: index 7");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = RegistryError::Validation {
            errors: vec![FieldError::new(Field::Email)],
        };
        assert!(err.is_validation());
        assert_eq!(err.field_errors().len(), 1);
        assert!(err.to_string().starts_with("Validation error: email:"));
        assert!(err.user_message().contains(Field::Email.message()));
    }

    #[test]
    fn test_quota_message_differs_from_storage() {
        let quota = RegistryError::StorageQuota("5120 byte limit".into());
        let generic = RegistryError::Storage("5120 byte limit".into());
        assert_ne!(quota.user_message(), generic.user_message());
        assert!(!quota.user_message().contains("5120"));
    }

    #[test]
    fn test_unknown_keeps_source() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = RegistryError::unknown("while saving", io_err);
        assert_eq!(err.source().unwrap().to_string(), "boom");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let registry_err: RegistryError = io_err.into();
        assert!(matches!(registry_err, RegistryError::Io(_)));
    }
}
