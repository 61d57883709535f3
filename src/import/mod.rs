//! Import of exported contact files
//!
//! Reading a file only checks its outer shape (a `data` array and, when present,
//! a matching checksum). Entry-level checks are advisory: they produce an
//! [`ImportSummary`] for the caller to confirm before anything is replaced.

use std::path::Path;

use log::info;
use serde::Serialize;
use serde_json::Value;

use crate::backup::checksum_value;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{Person, PersonRecord};

/// Fields that must be non-empty strings, with the legacy key accepted for each
const REQUIRED_TEXT_FIELDS: &[(&str, &str)] = &[
    ("name", "nome"),
    ("email", "email"),
    ("phone", "telefone"),
];

/// The birth date only has to be present; field validation judges its value
const BIRTH_DATE_KEYS: (&str, &str) = ("birthDate", "dataNascimento");

/// Counts and messages from checking imported entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn all_valid(&self) -> bool {
        self.invalid == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} record(s): {} valid, {} invalid",
            self.total, self.valid, self.invalid
        )
    }
}

/// Candidates read from an import file, awaiting confirmation
#[derive(Debug, Clone)]
pub struct ImportPreview {
    /// Structurally complete entries, as people
    pub candidates: Vec<Person>,
    pub summary: ImportSummary,
}

impl ImportPreview {
    /// Candidates that also pass full field validation
    pub fn fully_valid(&self) -> Vec<Person> {
        self.candidates
            .iter()
            .filter(|p| p.validate().is_valid())
            .cloned()
            .collect()
    }
}

/// Read the `data` array of an export file
///
/// Only `.json` files are accepted. A present checksum must match.
pub fn import_from_file(path: &Path) -> RegistryResult<Vec<Value>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(RegistryError::Import(format!(
            "only .json files can be imported: {}",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| RegistryError::Import(format!("cannot read {}: {}", path.display(), e)))?;

    import_from_str(&contents)
}

/// Same as [`import_from_file`] for already-read contents
pub fn import_from_str(contents: &str) -> RegistryResult<Vec<Value>> {
    let mut root: Value = serde_json::from_str(contents)
        .map_err(|e| RegistryError::Import(format!("file is not valid JSON: {}", e)))?;

    let data = match root.get_mut("data").map(Value::take) {
        Some(Value::Array(entries)) => entries,
        _ => {
            return Err(RegistryError::Import(
                "file has no \"data\" array".to_string(),
            ))
        }
    };

    if let Some(expected) = root.get("checksum").and_then(Value::as_str) {
        let actual = checksum_value(&Value::Array(data.clone()));
        if actual != expected {
            return Err(RegistryError::Corruption(format!(
                "import checksum mismatch (expected {}, got {})",
                expected, actual
            )));
        }
    }

    Ok(data)
}

/// Check every entry's structure without modifying it
pub fn validate_import_data(data: &[Value]) -> ImportSummary {
    let mut summary = ImportSummary {
        total: data.len(),
        ..ImportSummary::default()
    };

    for (i, entry) in data.iter().enumerate() {
        match entry_problems(entry) {
            problems if problems.is_empty() => summary.valid += 1,
            problems => {
                summary.invalid += 1;
                summary
                    .errors
                    .push(format!("Record {}: {}", i + 1, problems.join(", ")));
            }
        }
    }

    summary
}

/// Build a preview from raw entries: structurally complete ones become candidates
pub fn preview(data: &[Value]) -> ImportPreview {
    let summary = validate_import_data(data);
    let candidates = data
        .iter()
        .filter(|entry| entry_problems(entry).is_empty())
        .map(|entry| Person::from_record(record_from_value(entry)))
        .collect();

    info!("import preview: {}", summary.summary());
    ImportPreview {
        candidates,
        summary,
    }
}

fn entry_problems(entry: &Value) -> Vec<String> {
    let Some(object) = entry.as_object() else {
        return vec!["not an object".to_string()];
    };

    let mut problems: Vec<String> = REQUIRED_TEXT_FIELDS
        .iter()
        .filter(|(key, legacy)| {
            let value = object.get(*key).or_else(|| object.get(*legacy));
            !value
                .and_then(Value::as_str)
                .map_or(false, |s| !s.trim().is_empty())
        })
        .map(|(key, _)| format!("missing or empty {}", key))
        .collect();

    let (key, legacy) = BIRTH_DATE_KEYS;
    let birth_date = object.get(key).or_else(|| object.get(legacy));
    if birth_date.map_or(true, Value::is_null) {
        problems.push(format!("missing {}", key));
    }

    problems
}

/// Deserialize an entry, falling back to its text fields alone when the
/// identity or timestamps are malformed
fn record_from_value(entry: &Value) -> PersonRecord {
    serde_json::from_value(entry.clone()).unwrap_or_else(|_| {
        let text = |key: &str, legacy: &str| {
            entry
                .get(key)
                .or_else(|| entry.get(legacy))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        PersonRecord {
            id: None,
            name: text("name", "nome"),
            birth_date: text("birthDate", "dataNascimento"),
            phone: text("phone", "telefone"),
            email: text("email", "email"),
            created_at: None,
            updated_at: None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export_to_file;
    use serde_json::json;
    use tempfile::TempDir;

    fn ana() -> Person {
        Person::new("Ana Lima", "10/05/1995", "(21) 98888-7777", "ana@x.com")
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let person = ana();
        let path = export_to_file(&[person.to_record()], temp_dir.path(), None).unwrap();

        let data = import_from_file(&path).unwrap();
        assert_eq!(data.len(), 1);

        let preview = preview(&data);
        assert!(preview.summary.all_valid());
        assert_eq!(preview.candidates, vec![person]);
    }

    #[test]
    fn test_rejects_non_json_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.txt");
        std::fs::write(&path, r#"{"data": []}"#).unwrap();

        let err = import_from_file(&path).unwrap_err();
        assert!(matches!(err, RegistryError::Import(_)));
    }

    #[test]
    fn test_accepts_upper_case_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("CONTACTS.JSON");
        std::fs::write(&path, r#"{"data": []}"#).unwrap();
        assert!(import_from_file(&path).unwrap().is_empty());
    }

    #[test]
    fn test_requires_data_array() {
        assert!(matches!(
            import_from_str("not json"),
            Err(RegistryError::Import(_))
        ));
        assert!(matches!(
            import_from_str(r#"{"version": "1.0"}"#),
            Err(RegistryError::Import(_))
        ));
        assert!(matches!(
            import_from_str(r#"{"data": {"name": "x"}}"#),
            Err(RegistryError::Import(_))
        ));
    }

    #[test]
    fn test_checksum_mismatch_is_corruption() {
        let mut buffer = Vec::new();
        crate::export::export_to_writer(&[ana().to_record()], &mut buffer).unwrap();
        let tampered = String::from_utf8(buffer)
            .unwrap()
            .replace("ana@x.com", "eve@x.com");

        let err = import_from_str(&tampered).unwrap_err();
        assert!(matches!(err, RegistryError::Corruption(_)));
    }

    #[test]
    fn test_missing_checksum_is_accepted() {
        let data = import_from_str(r#"{"data": [{"name": "Ana"}]}"#).unwrap();
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_validate_import_data_counts() {
        let data = vec![
            json!({"name": "Ana", "email": "ana@x.com", "phone": "21988887777", "birthDate": "10/05/1995"}),
            json!({"nome": "Bia", "email": "bia@x.com", "telefone": "11999999999", "dataNascimento": "01/01/1980"}),
            json!({"name": "", "email": "c@x.com", "phone": "11999999999", "birthDate": "01/01/1980"}),
            json!({"name": "Dan", "email": "d@x.com", "phone": 11999999999u64}),
            json!("just a string"),
        ];
        let before = data.clone();

        let summary = validate_import_data(&data);

        assert_eq!(data, before);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.invalid, 3);
        assert_eq!(summary.errors[0], "Record 3: missing or empty name");
        assert_eq!(
            summary.errors[1],
            "Record 4: missing or empty phone, missing birthDate"
        );
        assert_eq!(summary.errors[2], "Record 5: not an object");
    }

    #[test]
    fn test_preview_keeps_structurally_valid_entries() {
        let data = vec![
            json!({"id": 12345, "name": "ana lima", "email": "ana@x.com", "phone": "21988887777", "birthDate": "10/05/1995"}),
            json!({"name": "Bad Phone", "email": "b@x.com", "phone": "123", "birthDate": "01/01/1980"}),
            json!({"email": "c@x.com"}),
        ];

        let preview = preview(&data);
        assert_eq!(preview.summary.valid, 2);
        assert_eq!(preview.candidates.len(), 2);
        assert_eq!(preview.candidates[0].name(), "ANA LIMA");

        let valid = preview.fully_valid();
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].email(), "ana@x.com");
    }
}
