//! Append-only audit log
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{RegistryError, RegistryResult};

use super::entry::AuditEntry;

/// Writes audit entries to a JSONL file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry and flush
    pub fn log(&self, entry: &AuditEntry) -> RegistryResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| RegistryError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| RegistryError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| RegistryError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| RegistryError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> RegistryResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| RegistryError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                RegistryError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                RegistryError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> RegistryResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    pub fn entry_count(&self) -> RegistryResult<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn person_entry(i: usize) -> AuditEntry {
        AuditEntry::create(
            EntityType::Person,
            format!("person-{}", i),
            Some(format!("PERSON {}", i)),
            &json!({"name": format!("PERSON {}", i)}),
        )
    }

    #[test]
    fn test_missing_log_is_empty() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        assert_eq!(logger.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&person_entry(1)).unwrap();
        logger.log(&AuditEntry::replace("import", 1, 4)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[1].operation, Operation::Replace);
        assert_eq!(entries[1].entity_type, EntityType::Collection);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();
        for i in 0..10 {
            logger.log(&person_entry(i)).unwrap();
        }

        let recent = logger.read_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].entity_id, "person-7");
        assert_eq!(recent[2].entity_id, "person-9");

        assert_eq!(logger.read_recent(50).unwrap().len(), 10);
    }

    #[test]
    fn test_blank_lines_skipped_and_garbage_rejected() {
        let (logger, _temp) = create_test_logger();
        logger.log(&person_entry(1)).unwrap();

        let mut file = OpenOptions::new().append(true).open(logger.path()).unwrap();
        writeln!(file).unwrap();
        assert_eq!(logger.entry_count().unwrap(), 1);

        writeln!(file, "not json").unwrap();
        assert!(matches!(logger.read_all(), Err(RegistryError::Json(_))));
    }
}
