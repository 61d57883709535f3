//! Strongly-typed ID wrappers
//!
//! Ids are opaque strings. New ones are random UUIDs, but ids read back from
//! storage or an import file are kept verbatim whatever their shape.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the ID text
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First eight characters, for compact listings
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((end, _)) => &self.0[..end],
                    None => &self.0,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(PersonId);
define_id!(BackupId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_id_creation() {
        let id = PersonId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let id1 = PersonId::new();
        let id2 = id1.clone();
        assert_eq!(id1, id2);
        assert_ne!(id1, PersonId::new());
    }

    #[test]
    fn test_foreign_ids_kept_verbatim() {
        let id: PersonId = "lq2x9k3abc".parse().unwrap();
        assert_eq!(id.as_str(), "lq2x9k3abc");
        assert_eq!(id.to_string(), "lq2x9k3abc");
    }

    #[test]
    fn test_short() {
        assert_eq!(PersonId::from("abcdefghijkl").short(), "abcdefgh");
        assert_eq!(PersonId::from("abc").short(), "abc");
    }

    #[test]
    fn test_id_serialization() {
        let id = BackupId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let deserialized: BackupId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
