//! Integrity checksums for snapshots and export files
//!
//! A 32-bit rolling string hash over the compact JSON text of the data. It
//! catches accidental corruption and edits, nothing more.

use serde::Serialize;
use serde_json::Value;

use crate::error::{RegistryError, RegistryResult};

/// Checksum of any serializable value
///
/// The value goes through `serde_json::Value` first so that object keys are
/// emitted in sorted order; the same data read back from a file hashes the same.
pub fn checksum<T: Serialize + ?Sized>(data: &T) -> RegistryResult<String> {
    let value = serde_json::to_value(data)
        .map_err(|e| RegistryError::unknown("Failed to serialize data for checksum", e))?;
    Ok(checksum_value(&value))
}

/// Checksum of an already-parsed JSON value
pub fn checksum_value(value: &Value) -> String {
    checksum_str(&value.to_string())
}

/// Checksum of raw text, as eight lowercase hex digits
pub fn checksum_str(text: &str) -> String {
    let hash = text
        .chars()
        .fold(0u32, |hash, c| hash.wrapping_mul(31).wrapping_add(c as u32));
    format!("{:08x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_values() {
        assert_eq!(checksum_str(""), "00000000");
        assert_eq!(checksum_str("a"), "00000061");
        assert_eq!(checksum_str("ab"), format!("{:08x}", 97 * 31 + 98));
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(checksum_str("ab"), checksum_str("ba"));
        assert_ne!(
            checksum(&json!([1, 2])).unwrap(),
            checksum(&json!([2, 1])).unwrap()
        );
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a: Value = serde_json::from_str(r#"{"name": "ANA", "email": "a@x.com"}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"email": "a@x.com", "name": "ANA"}"#).unwrap();
        assert_eq!(checksum_value(&a), checksum_value(&b));
    }

    #[test]
    fn test_detects_edit() {
        let original = json!([{"name": "ANA", "phone": "11999999999"}]);
        let edited = json!([{"name": "ANA", "phone": "11999999998"}]);
        assert_ne!(checksum_value(&original), checksum_value(&edited));
    }
}
