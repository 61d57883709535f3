//! JSON export
//!
//! Writes the collection as `{exportDate, version, data, checksum}`.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::backup::checksum;
use crate::error::{RegistryError, RegistryResult};
use crate::models::PersonRecord;
use crate::storage::write_json_atomic;

/// Export file format version
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// Export file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    /// When the export was made
    pub export_date: DateTime<Utc>,

    /// File format version
    pub version: String,

    /// Serialized contacts
    pub data: Vec<PersonRecord>,

    /// Checksum of `data`
    pub checksum: String,
}

impl ExportFile {
    /// Wrap `data` with a timestamp, version tag and checksum
    pub fn new(data: &[PersonRecord]) -> RegistryResult<Self> {
        Ok(Self {
            export_date: Utc::now(),
            version: EXPORT_FORMAT_VERSION.to_string(),
            data: data.to_vec(),
            checksum: checksum(data)?,
        })
    }
}

/// Default export filename for a given day, e.g. `contacts-backup-2025-03-01.json`
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("contacts-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Write an export of `data` to any writer as pretty JSON
pub fn export_to_writer<W: Write>(data: &[PersonRecord], writer: &mut W) -> RegistryResult<()> {
    let export = ExportFile::new(data)?;
    serde_json::to_writer_pretty(writer, &export)
        .map_err(|e| RegistryError::Export(e.to_string()))
}

/// Write an export of `data` into `dir`
///
/// Uses `filename` when given, otherwise a name embedding today's date.
/// Returns the path written.
pub fn export_to_file(
    data: &[PersonRecord],
    dir: &Path,
    filename: Option<&str>,
) -> RegistryResult<PathBuf> {
    let filename = match filename {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => default_export_filename(Local::now().date_naive()),
    };
    let path = dir.join(filename);

    let export = ExportFile::new(data)?;
    write_json_atomic(&path, &export)
        .map_err(|e| RegistryError::Export(format!("{}: {}", path.display(), e)))?;

    info!("exported {} contacts to {}", data.len(), path.display());
    Ok(path)
}
