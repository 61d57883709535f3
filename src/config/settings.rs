//! User settings for the contact registry
//!
//! Stored as `config.json` in the base directory. Every field has a serde
//! default so older files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::RegistryPaths;
use crate::error::RegistryError;

/// Default number of backup snapshots kept
pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// How many backup snapshots to retain
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,

    /// Selected theme, kept for front ends
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether mutations are written to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_max_backups() -> usize {
    DEFAULT_MAX_BACKUPS
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            max_backups: default_max_backups(),
            theme: default_theme(),
            log_level: default_log_level(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &RegistryPaths) -> Result<Self, RegistryError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| RegistryError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| RegistryError::Config(format!("Failed to parse settings file: {}", e)))?;

        if settings.max_backups == 0 {
            return Err(RegistryError::Config(
                "max_backups must be at least 1".into(),
            ));
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RegistryPaths) -> Result<(), RegistryError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| RegistryError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| RegistryError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.max_backups, 5);
        assert_eq!(settings.theme, "light");
        assert!(settings.audit_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistryPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            max_backups: 3,
            theme: "dark".into(),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistryPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"theme": "dark"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.theme, "dark");
        assert_eq!(loaded.max_backups, DEFAULT_MAX_BACKUPS);
    }

    #[test]
    fn test_zero_backups_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistryPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"max_backups": 0}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }
}
