//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// The whole collection was swapped (import or restore)
    Replace,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Replace => write!(f, "REPLACE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Collection,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Person => write!(f, "Person"),
            EntityType::Collection => write!(f, "Collection"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable description of the entity (e.g. the contact's name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// JSON representation of the entity before the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// JSON representation of the entity after the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a create operation
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Create, entity_type, entity_id, entity_name)
        }
    }

    /// Entry for an update operation
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::new(Operation::Update, entity_type, entity_id, entity_name)
        }
    }

    /// Entry for a delete operation
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Delete, entity_type, entity_id, entity_name)
        }
    }

    /// Entry for a wholesale replacement; only counts are recorded
    pub fn replace(source: impl Into<String>, previous_count: usize, new_count: usize) -> Self {
        Self {
            diff_summary: Some(format!(
                "{} contact(s) -> {} contact(s)",
                previous_count, new_count
            )),
            ..Self::new(Operation::Replace, EntityType::Collection, source, None)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Replace.to_string(), "REPLACE");
    }

    #[test]
    fn test_create_entry() {
        let data = json!({"name": "ANA LIMA", "email": "ana@x.com"});
        let entry = AuditEntry::create(EntityType::Person, "p-1", Some("ANA LIMA".into()), &data);

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(data));
    }

    #[test]
    fn test_replace_entry() {
        let entry = AuditEntry::replace("import", 3, 5);
        assert_eq!(entry.entity_type, EntityType::Collection);
        assert_eq!(entry.entity_id, "import");
        assert_eq!(entry.diff_summary.as_deref(), Some("3 contact(s) -> 5 contact(s)"));
    }

    #[test]
    fn test_human_readable() {
        let entry = AuditEntry::update(
            EntityType::Person,
            "p-1",
            Some("ANA".into()),
            &json!({"email": "a@x.com"}),
            &json!({"email": "b@x.com"}),
            Some("email: \"a@x.com\" -> \"b@x.com\"".into()),
        );
        let text = entry.format_human_readable();
        assert!(text.contains("UPDATE Person p-1 (ANA)"));
        assert!(text.contains("Changes: email"));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let entry = AuditEntry::replace("restore", 0, 1);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("\"before\""));
        assert!(json.contains("\"operation\":\"replace\""));
    }
}
