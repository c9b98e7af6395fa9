//! Database connection management.
//!
//! Each worker opens its own [`Database`]. `SQLite` runs in WAL mode so
//! readers never block the single writer, and every write transaction is
//! opened with `BEGIN IMMEDIATE` so the writer lock is taken up front.

use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;

/// A database connection wrapper with configuration.
///
/// # Examples
///
/// ```no_run
/// use staylock::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/staylock.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
    pub(super) lock_wait: Duration,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// This function will:
    /// - Create the parent directory if `auto_create` is enabled
    /// - Set WAL mode, `synchronous = NORMAL` and `foreign_keys = ON`
    /// - Configure the busy timeout
    /// - Initialize or verify the schema and apply the trigger setting
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database does not exist and `auto_create` is disabled
    /// - The database file cannot be opened
    /// - PRAGMA settings cannot be applied
    /// - Schema initialization or verification fails
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if !config.path.exists() {
            if !config.auto_create {
                return Err(Error::not_found(format!(
                    "database {}",
                    config.path.display()
                )));
            }
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let mut conn = Connection::open_with_flags(&config.path, flags)?;

        // The busy timeout must be in place before the first statement that
        // can contend with another opener.
        conn.busy_timeout(config.busy_timeout)?;
        // PRAGMA journal_mode returns a result, so we use query_row
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;")?;

        super::migrations::check_schema_compatibility(&mut conn, config.overlap_trigger)?;

        let lock_wait = config.busy_timeout;
        Ok(Self {
            conn,
            config,
            lock_wait,
        })
    }

    /// Returns the configuration the database was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Verifies the file's integrity with `PRAGMA quick_check`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseCorruption`] if the check reports problems.
    pub fn verify_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA quick_check", [], |row| row.get(0))?;
        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption { details: result })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open(DatabaseConfig::new(&path)).unwrap();
        assert!(path.exists());

        let journal_mode: String = db
            .connection()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal_mode.to_lowercase(), "wal");

        let foreign_keys: i64 = db
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn test_database_auto_create_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subdir").join("test.db");

        assert!(!path.parent().unwrap().exists());
        let _db = Database::open(DatabaseConfig::new(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_database_without_auto_create() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.db");

        let err = Database::open(DatabaseConfig::new(&path).without_auto_create()).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        drop(Database::open(DatabaseConfig::new(&path)).unwrap());
        let db = Database::open(DatabaseConfig::new(&path)).unwrap();
        db.verify_integrity().unwrap();
    }
}
