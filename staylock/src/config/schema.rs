//! Configuration schema definitions.
//!
//! Every field is optional so that sources can be layered: a value left out
//! of one source falls through to the next, and finally to the built-in
//! default exposed by the accessor methods on [`Config`].

use std::num::NonZeroU32;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default writer lock wait in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use staylock::config::{Config, RetryConfig};
///
/// let config = Config {
///     retry: Some(RetryConfig {
///         max_attempts: Some(5),
///         jitter_ratio: None,
///     }),
///     ..Default::default()
/// };
/// assert!(!config.allow_implicit_version());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Store connection settings.
    pub database: Option<DatabaseSettings>,

    /// Retry budget for locking transactions.
    pub retry: Option<RetryConfig>,

    /// Backoff per transient failure class.
    pub backoff: Option<BackoffConfig>,

    /// Lock scan settings.
    pub lock: Option<LockConfig>,

    /// Room versioning settings.
    pub rooms: Option<RoomsConfig>,

    /// Store-level constraint settings.
    pub constraints: Option<ConstraintsConfig>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,

    /// Output format for CLI listings.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// How long a writer waits for the store lock.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(
            self.database
                .as_ref()
                .and_then(|d| d.busy_timeout_ms)
                .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
        )
    }

    /// Width of the lock-scan date bucket, `None` to scan whole rooms.
    #[must_use]
    pub fn date_bucket_days(&self) -> Option<NonZeroU32> {
        self.lock
            .as_ref()
            .and_then(|l| l.date_bucket_days)
            .and_then(NonZeroU32::new)
    }

    /// Whether room writes may fall back to the version on an in-memory view.
    #[must_use]
    pub fn allow_implicit_version(&self) -> bool {
        self.rooms
            .as_ref()
            .and_then(|r| r.allow_implicit_version)
            .unwrap_or(false)
    }

    /// Whether the store's overlap triggers are installed.
    #[must_use]
    pub fn overlap_trigger(&self) -> bool {
        self.constraints
            .as_ref()
            .and_then(|c| c.overlap_trigger)
            .unwrap_or(true)
    }

    /// Whether a missing data directory is an error instead of being created.
    #[must_use]
    pub fn autoinit_disabled(&self) -> bool {
        self.disable_autoinit.unwrap_or(false)
    }
}

/// `database` section.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSettings {
    /// Writer lock wait in milliseconds.
    pub busy_timeout_ms: Option<u64>,
}

/// `retry` section.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts including the first, default 3.
    pub max_attempts: Option<u32>,
    /// Fraction by which each backoff is randomly stretched or shrunk,
    /// default 0.25.
    pub jitter_ratio: Option<f64>,
}

/// `backoff` section, in milliseconds per failure class.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BackoffConfig {
    /// Default 20.
    pub serialization_failure_ms: Option<u64>,
    /// Default 1.
    pub deadlock_ms: Option<u64>,
    /// Default 150.
    pub lock_timeout_ms: Option<u64>,
}

/// `lock` section.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LockConfig {
    /// Width in days of the window a lock scan is narrowed to.
    pub date_bucket_days: Option<u32>,
}

/// `rooms` section.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RoomsConfig {
    /// Accept room writes that omit the expected version.
    pub allow_implicit_version: Option<bool>,
}

/// `constraints` section.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConstraintsConfig {
    /// Install the store's overlap triggers, default true.
    pub overlap_trigger: Option<bool>,
}

/// Output format for list and show commands.
///
/// # Examples
///
/// ```
/// use staylock::config::OutputFormat;
///
/// assert_eq!(OutputFormat::Json.to_string(), "json");
/// assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output format.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" | "human" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(crate::error::ValidationError::new(
                "output_format",
                format!("unknown output format '{other}' (expected table or json)"),
            )),
        }
    }
}
