//! Diagnostic logging bootstrap for the binary
//!
//! The library only emits through the `log` facade. This installs a
//! `flexi_logger` backend writing to stderr, honouring `RUST_LOG` first and
//! falling back to the configured level.

use flexi_logger::{Logger, LoggerHandle};

use crate::error::{RegistryError, RegistryResult};

const LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Start logging; keep the returned handle alive for the process lifetime
pub fn init_logging(default_level: &str) -> RegistryResult<LoggerHandle> {
    let level = normalize_level(default_level)?;

    Logger::try_with_env_or_str(level)
        .map_err(|e| RegistryError::Config(format!("invalid log specification: {}", e)))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|e| RegistryError::Config(format!("failed to start logger: {}", e)))
}

/// Lower-case `level` and check it names a known level
fn normalize_level(level: &str) -> RegistryResult<&'static str> {
    let wanted = level.trim().to_ascii_lowercase();
    LEVELS
        .iter()
        .copied()
        .find(|known| *known == wanted)
        .ok_or_else(|| {
            RegistryError::Config(format!(
                "unsupported log level `{}` (expected one of: {})",
                level,
                LEVELS.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("warn").unwrap(), "warn");
        assert_eq!(normalize_level(" DEBUG ").unwrap(), "debug");
        assert!(matches!(
            normalize_level("loud"),
            Err(RegistryError::Config(_))
        ));
    }
}
