//! Database configuration and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// File name of the database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "staylock.db";

/// Configuration for database connections.
///
/// # Examples
///
/// ```
/// use staylock::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/staylock.db")
///     .with_busy_timeout(Duration::from_millis(250))
///     .with_overlap_trigger(false);
/// assert_eq!(config.busy_timeout, Duration::from_millis(250));
/// assert!(!config.overlap_trigger);
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// How long a writer waits for the lock before failing with a lock
    /// timeout.
    pub busy_timeout: Duration,
    /// Whether to create the database (and its directory) if missing.
    pub auto_create: bool,
    /// Whether the store enforces the no-overlap rule with triggers in
    /// addition to the engine's own check.
    pub overlap_trigger: bool,
}

impl DatabaseConfig {
    /// Creates a new database configuration with default settings.
    ///
    /// Default settings:
    /// - `busy_timeout`: 5000ms
    /// - `auto_create`: true
    /// - `overlap_trigger`: true
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            overlap_trigger: true,
        }
    }

    /// Sets the busy timeout duration.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Refuses to create a missing database.
    #[must_use]
    pub const fn without_auto_create(mut self) -> Self {
        self.auto_create = false;
        self
    }

    /// Enables or disables the overlap triggers.
    #[must_use]
    pub const fn with_overlap_trigger(mut self, enabled: bool) -> Self {
        self.overlap_trigger = enabled;
        self
    }
}

/// Returns the default data directory, `~/.staylock`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(".staylock"))
        .ok_or_else(|| Error::Validation {
            field: "home_directory".into(),
            message: "Cannot determine home directory".into(),
        })
}

/// Resolves the data directory from `STAYLOCK_DATA_DIR` or the default.
///
/// # Errors
///
/// Returns an error if `STAYLOCK_DATA_DIR` is unset and the home directory
/// cannot be determined.
pub fn resolve_data_dir() -> Result<PathBuf> {
    match std::env::var_os("STAYLOCK_DATA_DIR") {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => default_data_dir(),
    }
}

/// Resolves the database path inside [`resolve_data_dir`].
///
/// # Errors
///
/// See [`resolve_data_dir`].
pub fn resolve_database_path() -> Result<PathBuf> {
    Ok(resolve_data_dir()?.join(DATABASE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_new() {
        let config = DatabaseConfig::new("/tmp/test.db");
        assert_eq!(config.path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(5000));
        assert!(config.auto_create);
        assert!(config.overlap_trigger);
    }

    #[test]
    fn test_config_without_auto_create() {
        let config = DatabaseConfig::new("/tmp/test.db").without_auto_create();
        assert!(!config.auto_create);
    }

    #[test]
    #[serial]
    fn test_resolve_database_path() {
        std::env::set_var("STAYLOCK_DATA_DIR", "/custom/data");
        let path = resolve_database_path().unwrap();
        assert_eq!(path, PathBuf::from("/custom/data/staylock.db"));

        std::env::remove_var("STAYLOCK_DATA_DIR");
        if let Ok(path) = resolve_database_path() {
            assert!(path.ends_with(".staylock/staylock.db"));
        }
    }
}
