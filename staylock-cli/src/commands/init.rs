//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the staylock data directory and database.

use crate::error::CliError;
use crate::utils::{data_dir, GlobalOptions};
use clap::Parser;
use staylock::config::CONFIG_FILE_NAME;
use staylock::database::DATABASE_FILE_NAME;
use staylock::{Database, DatabaseConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Written by `init --with-config`. Every value is the built-in default.
const DEFAULT_CONFIG: &str = "\
# staylock configuration
database:
  busy_timeout_ms: 5000
retry:
  max_attempts: 3
  jitter_ratio: 0.25
backoff:
  serialization_failure_ms: 20
  deadlock_ms: 1
  lock_timeout_ms: 150
# lock:
#   date_bucket_days: 30
rooms:
  allow_implicit_version: false
constraints:
  overlap_trigger: true
";

/// Initialize staylock data directory and database.
#[derive(Parser)]
#[command(about = "Initialize staylock data directory and database")]
pub struct InitCommand {
    /// Data directory to initialize
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Overwrite existing database
    #[arg(long)]
    overwrite: bool,

    /// Create default configuration file
    #[arg(long)]
    with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// `--disable-autoinit` is ignored here since creating the database is
    /// the whole point.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = match self.data_dir {
            Some(dir) => dir,
            None => data_dir(global)?,
        };
        let db_path = data_dir.join(DATABASE_FILE_NAME);
        let config_path = data_dir.join(CONFIG_FILE_NAME);

        if self.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!();
            println!("Would initialize staylock in: {}", data_dir.display());
            if !data_dir.exists() {
                println!("  - Create data directory: {}", data_dir.display());
            }
            match (db_path.exists(), self.overwrite) {
                (true, true) => println!("  - Recreate database: {}", db_path.display()),
                (true, false) => println!("  - Keep existing database: {}", db_path.display()),
                (false, _) => println!("  - Create database: {}", db_path.display()),
            }
            if self.with_config && !config_path.exists() {
                println!("  - Create configuration file: {}", config_path.display());
            }
            return Ok(());
        }

        let data_dir_created = !data_dir.exists();
        fs::create_dir_all(&data_dir)?;

        let existed = db_path.exists();
        if existed && self.overwrite {
            remove_database(&db_path)?;
        }

        let mut db_config = DatabaseConfig::new(&db_path);
        if let Some(ms) = global.busy_timeout {
            db_config = db_config.with_busy_timeout(Duration::from_millis(ms));
        }
        let db = Database::open(db_config)?;
        db.verify_integrity()?;

        let config_created = if self.with_config && !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)?;
            true
        } else {
            false
        };

        println!("Initialized staylock in: {}", data_dir.display());
        if data_dir_created {
            println!("  - Created data directory");
        }
        match (existed, self.overwrite) {
            (true, true) => println!("  - Recreated database"),
            (true, false) => println!("  - Database already exists (kept)"),
            (false, _) => println!("  - Created database"),
        }
        if config_created {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        Ok(())
    }
}

/// Removes the database file and its WAL companions.
fn remove_database(db_path: &Path) -> Result<(), CliError> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut companion = db_path.as_os_str().to_owned();
        companion.push(suffix);
        let companion = PathBuf::from(companion);
        if companion.exists() {
            fs::remove_file(companion)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: staylock::Config = serde_yaml::from_str(DEFAULT_CONFIG).unwrap();
        staylock::config::ConfigValidator::validate(&config).unwrap();
        assert!(config.overlap_trigger());
        assert!(!config.allow_implicit_version());
    }
}
