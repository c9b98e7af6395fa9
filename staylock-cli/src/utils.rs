//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database
//! management and output.

use crate::error::CliError;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use staylock::config::OutputFormat;
use staylock::database::{resolve_data_dir, DATABASE_FILE_NAME};
use staylock::events::LogSink;
use staylock::output::OutputFormatter;
use staylock::{
    BookingCoordinator, Config, ConfigBuilder, Database, DatabaseConfig, Deadline, EngineContext,
    RestoreCoordinator, RoomVersionGuard,
};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the writer lock wait (in milliseconds).
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,

    /// Give up on a command after this many milliseconds.
    pub deadline_ms: Option<u64>,

    /// Output format override.
    pub format: Option<OutputFormat>,
}

/// Resolve the data directory: `--data-dir`, then `STAYLOCK_DATA_DIR`, then
/// `~/.staylock`.
pub fn data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables
/// 2. `config.yaml` in the data directory
/// 3. Built-in defaults (lowest priority)
///
/// Global options are applied on top by the callers that use them.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    ConfigBuilder::new()
        .with_data_dir(data_dir(global)?)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = data_dir(global)?.join(DATABASE_FILE_NAME);
    let autoinit_disabled = global.disable_autoinit || config.autoinit_disabled();

    if !db_path.exists() && autoinit_disabled {
        return Err(CliError::NoDataDirectory);
    }

    let busy_timeout = global
        .busy_timeout
        .map_or_else(|| config.busy_timeout(), Duration::from_millis);
    let mut db_config = DatabaseConfig::new(db_path)
        .with_busy_timeout(busy_timeout)
        .with_overlap_trigger(config.overlap_trigger());
    if autoinit_disabled {
        db_config = db_config.without_auto_create();
    }

    Database::open(db_config).map_err(CliError::from)
}

/// Everything a command needs to talk to the engine.
pub struct Session {
    /// The merged configuration.
    pub config: Config,
    /// The open database.
    pub db: Database,
    /// Engine policies built from the configuration.
    pub ctx: EngineContext,
    deadline: Option<Deadline>,
    format: OutputFormat,
}

impl Session {
    /// Loads configuration and opens the database.
    ///
    /// The deadline, if any, starts counting here.
    pub fn open(global: &GlobalOptions) -> Result<Self, CliError> {
        let deadline = global.deadline_ms.map(|ms| Deadline::after(Duration::from_millis(ms)));
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let ctx = EngineContext::from_config(&config).with_events(Arc::new(LogSink));
        let format = global.format.or(config.output_format).unwrap_or_default();
        Ok(Self {
            config,
            db,
            ctx,
            deadline,
            format,
        })
    }

    /// A booking coordinator bound to the command's deadline.
    pub fn bookings(&mut self) -> BookingCoordinator<'_, Database> {
        let coordinator = BookingCoordinator::new(&mut self.db, &self.ctx);
        match self.deadline {
            Some(deadline) => coordinator.with_deadline(deadline),
            None => coordinator,
        }
    }

    /// A restore coordinator bound to the command's deadline.
    pub fn restores(&mut self) -> RestoreCoordinator<'_, Database> {
        let coordinator = RestoreCoordinator::new(&mut self.db, &self.ctx);
        match self.deadline {
            Some(deadline) => coordinator.with_deadline(deadline),
            None => coordinator,
        }
    }

    /// A room guard.
    pub fn rooms(&mut self) -> RoomVersionGuard<'_, Database> {
        RoomVersionGuard::new(&mut self.db, &self.ctx)
    }

    /// The formatter for this invocation.
    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        self.format.create_formatter()
    }
}

/// Write a block of output to stdout followed by a newline.
pub fn print_output(text: &str) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{text}")?;
    Ok(())
}

/// The name recorded as the actor of deletes and restores when none is
/// given.
pub fn default_actor() -> String {
    std::env::var("USER")
        .ok()
        .filter(|user| !user.trim().is_empty())
        .unwrap_or_else(|| "cli".to_string())
}
