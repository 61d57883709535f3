//! Contact display formatting
//!
//! Formats contacts, backups and import results for terminal output.

use chrono::NaiveDate;

use crate::audit::AuditEntry;
use crate::backup::BackupInfo;
use crate::import::ImportSummary;
use crate::models::Person;

/// Format indexed contacts as a table
///
/// Positions are shown 1-based, as the CLI accepts them.
pub fn format_person_list(persons: &[(usize, Person)], today: NaiveDate) -> String {
    if persons.is_empty() {
        return "No contacts found.".to_string();
    }

    let name_width = column_width(persons.iter().map(|(_, p)| p.name()), "Name");
    let email_width = column_width(persons.iter().map(|(_, p)| p.email()), "Email");
    let phone_width = column_width(persons.iter().map(|(_, p)| p.phone()), "Phone");

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:<name_width$}  {:<10}  {:>3}  {:<phone_width$}  {}\n",
        "#", "Name", "Born", "Age", "Phone", "Email",
    ));
    output.push_str(&format!(
        "{:->4}  {:-<name_width$}  {:-<10}  {:->3}  {:-<phone_width$}  {:-<email_width$}\n",
        "", "", "", "", "", "",
    ));

    for (index, person) in persons {
        let age = person
            .age_on(today)
            .map(|a| a.to_string())
            .unwrap_or_else(|| "?".to_string());
        output.push_str(&format!(
            "{:>4}  {:<name_width$}  {:<10}  {:>3}  {:<phone_width$}  {}\n",
            index + 1,
            person.name(),
            person.birth_date(),
            age,
            person.phone(),
            person.email(),
        ));
    }

    output.push_str(&format!("\n{} contact(s)\n", persons.len()));
    output
}

/// Format a single contact's details
pub fn format_person_details(person: &Person, today: NaiveDate) -> String {
    let mut output = String::new();

    output.push_str(&format!("Contact: {}\n", person.name()));
    output.push_str(&format!("  ID:         {}\n", person.id()));
    output.push_str(&format!("  Birth date: {}", person.birth_date()));
    if let Some(age) = person.age_on(today) {
        output.push_str(&format!(" ({} years)", age));
    }
    output.push('\n');
    output.push_str(&format!("  Phone:      {}\n", person.phone()));
    output.push_str(&format!("  Email:      {}\n", person.email()));
    output.push_str(&format!(
        "  Created:    {}\n",
        person.created_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!(
        "  Updated:    {}\n",
        person.updated_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

/// Format the backup history, newest first
pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<36}  {:<19}  {:>8}  {}\n",
        "ID", "Created (UTC)", "Contacts", "Checksum"
    ));
    output.push_str(&format!("{:-<36}  {:-<19}  {:->8}  {:-<8}\n", "", "", "", ""));

    for backup in backups {
        output.push_str(&format!(
            "{:<36}  {:<19}  {:>8}  {}\n",
            backup.id.as_str(),
            backup.timestamp.format("%Y-%m-%d %H:%M:%S"),
            backup.record_count,
            backup.checksum
        ));
    }

    output
}

/// Format the outcome of checking an import file
pub fn format_import_summary(summary: &ImportSummary) -> String {
    let mut output = format!("Import check: {}\n", summary.summary());
    for error in &summary.errors {
        output.push_str(&format!("  - {}\n", error));
    }
    output
}

/// Format audit entries, one block per entry
pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No history recorded.".to_string();
    }

    entries
        .iter()
        .map(AuditEntry::format_human_readable)
        .collect::<Vec<_>>()
        .join("\n")
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
