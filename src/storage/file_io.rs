//! File I/O utilities with atomic writes
//!
//! Writes go to a temp file in the target directory and are renamed into
//! place, so a file is either fully replaced or left as it was.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{RegistryError, RegistryResult};

/// Read a whole file, returning `None` if it doesn't exist
pub fn read_optional<P: AsRef<Path>>(path: P) -> RegistryResult<Option<String>> {
    let path = path.as_ref();

    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(RegistryError::Storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write bytes to a file atomically (write to temp, then rename)
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> RegistryResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            write_error(
                &format!("Failed to create directory {}", parent.display()),
                e,
            )
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let result = write_and_sync(&temp_path, contents).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| write_error("Failed to rename temp file", e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

/// Serialize `data` as pretty JSON and write it atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> RegistryResult<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let json = serde_json::to_vec_pretty(data)
        .map_err(|e| RegistryError::Storage(format!("Failed to serialize data: {}", e)))?;
    write_atomic(path, &json)
}

fn write_and_sync(path: &Path, contents: &[u8]) -> RegistryResult<()> {
    let file = File::create(path).map_err(|e| write_error("Failed to create temp file", e))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents)
        .map_err(|e| write_error("Failed to write data", e))?;
    writer
        .flush()
        .map_err(|e| write_error("Failed to flush data", e))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| write_error("Failed to sync data", e))
}

/// Map a write failure, keeping "disk full" distinct from other failures
fn write_error(context: &str, err: io::Error) -> RegistryError {
    if is_out_of_space(&err) {
        RegistryError::StorageQuota(format!("{}: {}", context, err))
    } else {
        RegistryError::Storage(format!("{}: {}", context, err))
    }
}

fn is_out_of_space(err: &io::Error) -> bool {
    #[cfg(unix)]
    const OUT_OF_SPACE: &[i32] = &[28, 122]; // ENOSPC, EDQUOT
    #[cfg(windows)]
    const OUT_OF_SPACE: &[i32] = &[39, 112]; // ERROR_HANDLE_DISK_FULL, ERROR_DISK_FULL
    #[cfg(not(any(unix, windows)))]
    const OUT_OF_SPACE: &[i32] = &[];

    err.raw_os_error()
        .map_or(false, |code| OUT_OF_SPACE.contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        value: i32,
    }

    #[test]
    fn test_read_nonexistent_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");
        assert!(read_optional(&path).unwrap().is_none());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.json");

        write_atomic(&path, b"[]").unwrap();
        assert_eq!(read_optional(&path).unwrap().as_deref(), Some("[]"));

        write_atomic(&path, b"[1]").unwrap();
        assert_eq!(read_optional(&path).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.json");

        write_atomic(&path, b"{}").unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("contacts.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("out.json");

        let sample = Sample {
            name: "test".into(),
            value: 42,
        };
        write_json_atomic(&path, &sample).unwrap();

        let loaded: Sample = serde_json::from_str(&read_optional(&path).unwrap().unwrap()).unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn test_out_of_space_maps_to_quota() {
        #[cfg(unix)]
        let err = io::Error::from_raw_os_error(28);
        #[cfg(windows)]
        let err = io::Error::from_raw_os_error(112);
        #[cfg(any(unix, windows))]
        assert!(matches!(
            write_error("write", err),
            RegistryError::StorageQuota(_)
        ));

        let other = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(write_error("write", other), RegistryError::Storage(_)));
    }
}
