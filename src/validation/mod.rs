//! Field validation for contact records
//!
//! Every person field has an enumerated identifier ([`Field`]) that maps to a
//! pure validator and a fixed user-facing message. Validators never fail;
//! they answer `true` or `false`.

pub(crate) mod rules;

pub use rules::{
    normalize_phone, validate_birth_date, validate_birth_date_on, validate_email,
    validate_name, validate_phone, MAX_AGE_YEARS,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifies one validated field of a person record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    BirthDate,
    Phone,
    Email,
}

impl Field {
    /// All fields, in validation order
    pub fn all() -> &'static [Field] {
        &[Field::Name, Field::BirthDate, Field::Phone, Field::Email]
    }

    /// Key used for this field in serialized records
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::BirthDate => "birthDate",
            Field::Phone => "phone",
            Field::Email => "email",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::BirthDate => "Birth date",
            Field::Phone => "Phone",
            Field::Email => "Email",
        }
    }

    /// Fixed message reported when this field fails validation
    pub fn message(&self) -> &'static str {
        match self {
            Field::Name => {
                "Name must be 2-50 characters and contain only letters, spaces, hyphens or apostrophes"
            }
            Field::BirthDate => {
                "Birth date must be a valid past date in DD/MM/YYYY format (max age 120)"
            }
            Field::Phone => "Phone must have 10 or 11 digits with a valid area code",
            Field::Email => "Email must be a valid address (e.g. name@example.com)",
        }
    }

    /// The validator for this field
    pub fn validator(&self) -> fn(&str) -> bool {
        match self {
            Field::Name => validate_name,
            Field::BirthDate => validate_birth_date,
            Field::Phone => validate_phone,
            Field::Email => validate_email,
        }
    }

    /// Validate a string value for this field
    pub fn validate(&self, value: &str) -> bool {
        (self.validator())(value)
    }

    /// Validate a dynamically-typed value; anything but a string is invalid
    pub fn validate_value(&self, value: &Value) -> bool {
        value.as_str().map_or(false, |s| self.validate(s))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A single failing field and the message to show for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    /// Error for `field` with its fixed message
    pub fn new(field: Field) -> Self {
        Self {
            field,
            message: field.message().to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}

/// Outcome of validating a whole record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Build a result from the collected field errors
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The error for a specific field, if it failed
    pub fn error_for(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_dispatch() {
        assert!(Field::Email.validate("user@example.com"));
        assert!(!Field::Email.validate("user@.com"));
        assert!(Field::Phone.validate("11999999999"));
        assert!(Field::Name.validate("Ana Lima"));
    }

    #[test]
    fn test_validate_value_rejects_non_strings() {
        assert!(!Field::Name.validate_value(&Value::Null));
        assert!(!Field::Phone.validate_value(&json!(11999999999u64)));
        assert!(!Field::Email.validate_value(&json!(["a@b.co"])));
        assert!(Field::Email.validate_value(&json!("a@b.co")));
    }

    #[test]
    fn test_field_serializes_as_key() {
        for field in Field::all() {
            let json = serde_json::to_string(field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.key()));
        }
    }

    #[test]
    fn test_validation_result() {
        let ok = ValidationResult::from_errors(Vec::new());
        assert!(ok.is_valid());
        assert!(ok.errors().is_empty());

        let failed = ValidationResult::from_errors(vec![FieldError::new(Field::Phone)]);
        assert!(!failed.is_valid());
        assert_eq!(
            failed.error_for(Field::Phone).unwrap().message,
            Field::Phone.message()
        );
        assert!(failed.error_for(Field::Email).is_none());
    }
}
