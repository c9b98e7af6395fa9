//! Configuration merging and precedence handling.

use crate::config::schema::{BackoffConfig, Config, RetryConfig};

/// Merges configuration layers: file, then environment, then programmatic.
///
/// # Examples
///
/// ```
/// use staylock::config::{Config, ConfigMerger};
///
/// let low = Config { disable_autoinit: Some(false), ..Default::default() };
/// let high = Config { disable_autoinit: Some(true), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.disable_autoinit, Some(true));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - `retry` and `backoff`: field-by-field merge
    /// - Single-field sections: source overwrites if Some
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref database) = source.database {
            if database.busy_timeout_ms.is_some() {
                target.database = Some(*database);
            }
        }

        if let Some(ref source_retry) = source.retry {
            target.retry = Some(match target.retry {
                Some(ref target_retry) => Self::merge_retry(target_retry, source_retry),
                None => *source_retry,
            });
        }

        if let Some(ref source_backoff) = source.backoff {
            target.backoff = Some(match target.backoff {
                Some(ref target_backoff) => Self::merge_backoff(target_backoff, source_backoff),
                None => *source_backoff,
            });
        }

        if let Some(ref lock) = source.lock {
            if lock.date_bucket_days.is_some() {
                target.lock = Some(*lock);
            }
        }

        if let Some(ref rooms) = source.rooms {
            if rooms.allow_implicit_version.is_some() {
                target.rooms = Some(*rooms);
            }
        }

        if let Some(ref constraints) = source.constraints {
            if constraints.overlap_trigger.is_some() {
                target.constraints = Some(*constraints);
            }
        }
    }

    fn merge_retry(target: &RetryConfig, source: &RetryConfig) -> RetryConfig {
        RetryConfig {
            max_attempts: source.max_attempts.or(target.max_attempts),
            jitter_ratio: source.jitter_ratio.or(target.jitter_ratio),
        }
    }

    fn merge_backoff(target: &BackoffConfig, source: &BackoffConfig) -> BackoffConfig {
        BackoffConfig {
            serialization_failure_ms: source
                .serialization_failure_ms
                .or(target.serialization_failure_ms),
            deadlock_ms: source.deadlock_ms.or(target.deadlock_ms),
            lock_timeout_ms: source.lock_timeout_ms.or(target.lock_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DatabaseSettings, RoomsConfig};

    #[test]
    fn test_merge_retry_field_by_field() {
        let mut target = Config {
            retry: Some(RetryConfig {
                max_attempts: Some(2),
                jitter_ratio: Some(0.1),
            }),
            ..Default::default()
        };
        let source = Config {
            retry: Some(RetryConfig {
                max_attempts: Some(9),
                jitter_ratio: None,
            }),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        let retry = target.retry.unwrap();
        assert_eq!(retry.max_attempts, Some(9));
        assert_eq!(retry.jitter_ratio, Some(0.1));
    }

    #[test]
    fn test_merge_none_values_dont_overwrite() {
        let mut target = Config {
            database: Some(DatabaseSettings {
                busy_timeout_ms: Some(100),
            }),
            rooms: Some(RoomsConfig {
                allow_implicit_version: Some(true),
            }),
            ..Default::default()
        };
        let source = Config {
            database: Some(DatabaseSettings {
                busy_timeout_ms: None,
            }),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        assert_eq!(target.busy_timeout().as_millis(), 100);
        assert!(target.allow_implicit_version());
    }

    #[test]
    fn test_merge_backoff_into_empty() {
        let mut target = Config::default();
        let source = Config {
            backoff: Some(BackoffConfig {
                deadlock_ms: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };
        ConfigMerger::merge_into(&mut target, &source);
        assert_eq!(target.backoff, source.backoff);
    }
}
