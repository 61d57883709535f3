//! Change summaries for audit entries

use crate::models::PersonRecord;
use crate::validation::Field;

/// Describe which contact fields changed between two versions
///
/// Identity and timestamps are ignored. Returns `None` when nothing the user
/// edits has changed.
pub fn generate_diff(before: &PersonRecord, after: &PersonRecord) -> Option<String> {
    let changes: Vec<String> = Field::all()
        .iter()
        .filter_map(|field| {
            let old = field_value(before, *field);
            let new = field_value(after, *field);
            (old != new).then(|| format!("{}: {} -> {}", field, quote(old), quote(new)))
        })
        .collect();

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn field_value(record: &PersonRecord, field: Field) -> &str {
    match field {
        Field::Name => &record.name,
        Field::BirthDate => &record.birth_date,
        Field::Phone => &record.phone,
        Field::Email => &record.email,
    }
}

/// Quote a value, truncating long ones
fn quote(value: &str) -> String {
    const MAX_CHARS: usize = 50;
    if value.chars().count() > MAX_CHARS {
        let head: String = value.chars().take(MAX_CHARS - 3).collect();
        format!("\"{}...\"", head)
    } else {
        format!("\"{}\"", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;

    #[test]
    fn test_no_changes() {
        let record = Person::new("Ana", "10/05/1995", "21988887777", "ana@x.com").to_record();
        let mut touched = record.clone();
        touched.updated_at = None;
        assert_eq!(generate_diff(&record, &touched), None);
    }

    #[test]
    fn test_changed_fields_listed_in_order() {
        let before = Person::new("Ana", "10/05/1995", "21988887777", "ana@x.com").to_record();
        let mut after = before.clone();
        after.email = "ana.lima@x.com".into();
        after.name = "ANA LIMA".into();

        assert_eq!(
            generate_diff(&before, &after).unwrap(),
            "name: \"ANA\" -> \"ANA LIMA\", email: \"ana@x.com\" -> \"ana.lima@x.com\""
        );
    }

    #[test]
    fn test_long_values_truncated() {
        let long = "ç".repeat(60);
        let quoted = quote(&long);
        assert!(quoted.ends_with("...\""));
        assert_eq!(quoted.chars().count(), 47 + 5);
    }
}
