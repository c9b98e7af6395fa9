//! Property-based tests for configuration layering.

use super::merger::ConfigMerger;
use super::schema::{BackoffConfig, Config, DatabaseSettings, RetryConfig};
use super::validator::{ConfigValidator, MAX_RETRY_ATTEMPTS, MAX_WAIT_MS};
use proptest::prelude::*;

fn retry_strategy() -> impl Strategy<Value = RetryConfig> {
    (
        prop::option::of(1u32..=MAX_RETRY_ATTEMPTS),
        prop::option::of(0.0f64..=1.0),
    )
        .prop_map(|(max_attempts, jitter_ratio)| RetryConfig {
            max_attempts,
            jitter_ratio,
        })
}

fn backoff_strategy() -> impl Strategy<Value = BackoffConfig> {
    (
        prop::option::of(0u64..=MAX_WAIT_MS),
        prop::option::of(0u64..=MAX_WAIT_MS),
        prop::option::of(0u64..=MAX_WAIT_MS),
    )
        .prop_map(|(s, d, l)| BackoffConfig {
            serialization_failure_ms: s,
            deadlock_ms: d,
            lock_timeout_ms: l,
        })
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(retry_strategy()),
        prop::option::of(backoff_strategy()),
        prop::option::of(1u64..=MAX_WAIT_MS),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(retry, backoff, busy, autoinit)| Config {
            retry,
            backoff,
            database: busy.map(|ms| DatabaseSettings {
                busy_timeout_ms: Some(ms),
            }),
            disable_autoinit: autoinit,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn merge_empty_is_right_identity(config in config_strategy()) {
        let mut result = config.clone();
        ConfigMerger::merge_into(&mut result, &Config::default());
        prop_assert_eq!(result, config);
    }

    #[test]
    fn merge_into_empty_copies(config in config_strategy()) {
        let mut result = Config::default();
        ConfigMerger::merge_into(&mut result, &config);
        prop_assert_eq!(result, config);
    }

    #[test]
    fn higher_layer_wins_when_set(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        let expect_attempts = high.retry.and_then(|r| r.max_attempts)
            .or_else(|| low.retry.and_then(|r| r.max_attempts));
        prop_assert_eq!(result.retry.and_then(|r| r.max_attempts), expect_attempts);

        let expect_deadlock = high.backoff.and_then(|b| b.deadlock_ms)
            .or_else(|| low.backoff.and_then(|b| b.deadlock_ms));
        prop_assert_eq!(result.backoff.and_then(|b| b.deadlock_ms), expect_deadlock);

        prop_assert_eq!(
            result.disable_autoinit,
            high.disable_autoinit.or(low.disable_autoinit)
        );
    }

    #[test]
    fn merging_valid_layers_stays_valid(low in config_strategy(), high in config_strategy()) {
        let mut result = low;
        ConfigMerger::merge_into(&mut result, &high);
        prop_assert!(ConfigValidator::validate(&result).is_ok());
    }
}
