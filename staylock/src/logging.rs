//! Logging infrastructure for the staylock library.
//!
//! Library code logs through the `log` facade. This module provides the
//! stderr backend the CLI installs, with three verbosity levels.

use std::env;
use std::fmt;
use std::io::Write;

/// Environment variable consulted when no CLI flag sets the level.
pub const LOG_MODE_ENV: &str = "STAYLOCK_LOG_MODE";

/// Logging level for controlling output verbosity.
///
/// Log levels are ordered from least verbose (Quiet) to most verbose (Verbose).
///
/// # Examples
///
/// ```
/// use staylock::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Suppress all output.
    Quiet,
    /// Errors and warnings.
    Normal,
    /// Everything down to debug messages.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level from a string.
    ///
    /// Recognizes: "quiet", "normal", "verbose" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use staylock::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("loud").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }

    /// The `log` crate filter matching this level.
    #[must_use]
    pub const fn filter(self) -> log::LevelFilter {
        match self {
            Self::Quiet => log::LevelFilter::Off,
            Self::Normal => log::LevelFilter::Warn,
            Self::Verbose => log::LevelFilter::Debug,
        }
    }

    /// The closest level to a `log` crate filter.
    #[must_use]
    pub const fn from_filter(filter: log::LevelFilter) -> Self {
        match filter {
            log::LevelFilter::Off => Self::Quiet,
            log::LevelFilter::Error | log::LevelFilter::Warn => Self::Normal,
            log::LevelFilter::Info | log::LevelFilter::Debug | log::LevelFilter::Trace => Self::Verbose,
        }
    }
}

/// A stderr backend for the `log` facade.
///
/// A logger built with [`Logger::new`] filters at a fixed level. The one
/// [`init_logger`] installs follows `log::max_level()` instead, so later
/// calls can still change what reaches stderr.
///
/// # Examples
///
/// ```
/// use log::Log;
/// use staylock::{LogLevel, Logger};
///
/// let logger = Logger::new(LogLevel::Normal);
/// let meta = log::Metadata::builder().level(log::Level::Info).build();
/// assert!(!logger.enabled(&meta));
/// ```
#[derive(Debug)]
pub struct Logger {
    // None follows the global max level.
    level: Option<LogLevel>,
}

impl Logger {
    /// Creates a new logger with the specified log level.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level: Some(level) }
    }

    /// Creates a logger that filters at whatever `log::max_level()` is.
    #[must_use]
    pub const fn global() -> Self {
        Self { level: None }
    }

    /// Returns the current log level.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.level.unwrap_or_else(|| LogLevel::from_filter(log::max_level()))
    }

    fn filter(&self) -> log::LevelFilter {
        self.level.map_or_else(log::max_level, LogLevel::filter)
    }

    fn format(record: &log::Record<'_>) -> String {
        let label = match record.level() {
            log::Level::Error => "ERROR",
            log::Level::Warn => "WARN",
            log::Level::Info => "INFO",
            log::Level::Debug => "DEBUG",
            log::Level::Trace => "TRACE",
        };
        format!("{label}: {}", record.args())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.filter()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            // A closed stderr leaves nowhere to report the failure.
            let _ = writeln!(std::io::stderr().lock(), "{}", Self::format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Resolves the level from CLI flags and the environment.
///
/// The priority order is:
/// 1. CLI flags (verbose/quiet, verbose wins when both are set)
/// 2. `STAYLOCK_LOG_MODE` environment variable
/// 3. Default (Normal)
#[must_use]
pub fn resolve_level(verbose: bool, quiet: bool) -> LogLevel {
    if verbose {
        return LogLevel::Verbose;
    }
    if quiet {
        return LogLevel::Quiet;
    }

    env::var(LOG_MODE_ENV)
        .ok()
        .and_then(|value| LogLevel::parse(&value).ok())
        .unwrap_or(LogLevel::Normal)
}

/// Resolves the level and installs a [`Logger`] as the global `log` backend.
///
/// Only the first call installs a backend. It filters at `log::max_level()`,
/// so later calls still change the effective level. Returns the resolved
/// level.
///
/// # Examples
///
/// ```
/// use staylock::{init_logger, LogLevel};
///
/// assert_eq!(init_logger(true, false), LogLevel::Verbose);
/// ```
pub fn init_logger(verbose: bool, quiet: bool) -> LogLevel {
    let level = resolve_level(verbose, quiet);
    // Err means a backend is already installed, which is fine.
    let _ = log::set_boxed_logger(Box::new(Logger::global()));
    log::set_max_level(level.filter());
    level
}
