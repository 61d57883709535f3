//! Path management for the contact registry
//!
//! ## Path Resolution Order
//!
//! 1. `CONTACT_REGISTRY_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/contact-registry` or `~/.config/contact-registry`
//! 3. Windows: `%APPDATA%\contact-registry`

use std::path::PathBuf;

use crate::error::RegistryError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "CONTACT_REGISTRY_DATA_DIR";

const APP_DIR_NAME: &str = "contact-registry";

/// Manages all paths used by the registry
#[derive(Debug, Clone)]
pub struct RegistryPaths {
    base_dir: PathBuf,
}

impl RegistryPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, RegistryError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create RegistryPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the key-value store files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default destination for exported files
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base, data and export directories exist
    pub fn ensure_directories(&self) -> Result<(), RegistryError> {
        for dir in [self.base_dir.clone(), self.data_dir(), self.export_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                RegistryError::Io(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, RegistryError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                RegistryError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR_NAME))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, RegistryError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| RegistryError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistryPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.export_dir(), temp_dir.path().join("exports"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(DATA_DIR_ENV, custom_path);
        let paths = RegistryPaths::new().unwrap();
        env::remove_var(DATA_DIR_ENV);

        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistryPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.export_dir().exists());
    }
}
