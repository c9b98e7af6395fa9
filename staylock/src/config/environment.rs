//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `STAYLOCK_*` environment variables that
//! override configuration file values.

use std::env;
use std::str::FromStr;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// | Variable | Field |
/// |---|---|
/// | `STAYLOCK_BUSY_TIMEOUT_MS` | `database.busy_timeout_ms` |
/// | `STAYLOCK_RETRY_MAX_ATTEMPTS` | `retry.max_attempts` |
/// | `STAYLOCK_RETRY_JITTER_RATIO` | `retry.jitter_ratio` |
/// | `STAYLOCK_BACKOFF_SERIALIZATION_MS` | `backoff.serialization_failure_ms` |
/// | `STAYLOCK_BACKOFF_DEADLOCK_MS` | `backoff.deadlock_ms` |
/// | `STAYLOCK_BACKOFF_LOCK_TIMEOUT_MS` | `backoff.lock_timeout_ms` |
/// | `STAYLOCK_DATE_BUCKET_DAYS` | `lock.date_bucket_days` |
/// | `STAYLOCK_ALLOW_IMPLICIT_VERSION` | `rooms.allow_implicit_version` |
/// | `STAYLOCK_OVERLAP_TRIGGER` | `constraints.overlap_trigger` |
/// | `STAYLOCK_DISABLE_AUTOINIT` | `disable_autoinit` |
/// | `STAYLOCK_OUTPUT_FORMAT` | `output_format` |
///
/// # Examples
///
/// ```no_run
/// use staylock::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., non-numeric timeout, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(ms) = Self::number("STAYLOCK_BUSY_TIMEOUT_MS")? {
            config.database.get_or_insert_with(Default::default).busy_timeout_ms = Some(ms);
        }

        Self::apply_retry_overrides(config)?;
        Self::apply_backoff_overrides(config)?;

        if let Some(days) = Self::number("STAYLOCK_DATE_BUCKET_DAYS")? {
            config.lock.get_or_insert_with(Default::default).date_bucket_days = Some(days);
        }

        if let Some(allow) = Self::flag("STAYLOCK_ALLOW_IMPLICIT_VERSION")? {
            config.rooms.get_or_insert_with(Default::default).allow_implicit_version = Some(allow);
        }

        if let Some(enabled) = Self::flag("STAYLOCK_OVERLAP_TRIGGER")? {
            config.constraints.get_or_insert_with(Default::default).overlap_trigger = Some(enabled);
        }

        if let Some(disabled) = Self::flag("STAYLOCK_DISABLE_AUTOINIT")? {
            config.disable_autoinit = Some(disabled);
        }

        if let Ok(format) = env::var("STAYLOCK_OUTPUT_FORMAT") {
            config.output_format = Some(format.parse().map_err(|e: crate::error::ValidationError| {
                Error::Validation {
                    field: "STAYLOCK_OUTPUT_FORMAT".into(),
                    message: e.message,
                }
            })?);
        }

        Ok(())
    }

    fn apply_retry_overrides(config: &mut Config) -> Result<()> {
        let mut retry = config.retry.unwrap_or_default();
        let mut modified = false;

        if let Some(attempts) = Self::number("STAYLOCK_RETRY_MAX_ATTEMPTS")? {
            retry.max_attempts = Some(attempts);
            modified = true;
        }
        if let Some(ratio) = Self::number("STAYLOCK_RETRY_JITTER_RATIO")? {
            retry.jitter_ratio = Some(ratio);
            modified = true;
        }

        if modified {
            config.retry = Some(retry);
        }
        Ok(())
    }

    fn apply_backoff_overrides(config: &mut Config) -> Result<()> {
        let mut backoff = config.backoff.unwrap_or_default();
        let mut modified = false;

        if let Some(ms) = Self::number("STAYLOCK_BACKOFF_SERIALIZATION_MS")? {
            backoff.serialization_failure_ms = Some(ms);
            modified = true;
        }
        if let Some(ms) = Self::number("STAYLOCK_BACKOFF_DEADLOCK_MS")? {
            backoff.deadlock_ms = Some(ms);
            modified = true;
        }
        if let Some(ms) = Self::number("STAYLOCK_BACKOFF_LOCK_TIMEOUT_MS")? {
            backoff.lock_timeout_ms = Some(ms);
            modified = true;
        }

        if modified {
            config.backoff = Some(backoff);
        }
        Ok(())
    }

    fn number<T: FromStr>(name: &str) -> Result<Option<T>> {
        let Ok(raw) = env::var(name) else {
            return Ok(None);
        };
        raw.trim().parse().map(Some).map_err(|_| Error::Validation {
            field: name.into(),
            message: format!("Invalid number: '{raw}'"),
        })
    }

    fn flag(name: &str) -> Result<Option<bool>> {
        env::var(name)
            .ok()
            .map(|raw| Self::parse_bool(name, &raw))
            .transpose()
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
