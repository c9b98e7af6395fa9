//! Configuration system for staylock.
//!
//! This module provides layered configuration with support for:
//! - A YAML file, `config.yaml`, in the data directory
//! - Environment variable overrides (`STAYLOCK_*`)
//! - Programmatic configuration via builder pattern
//! - Validation of every merged value
//!
//! # Examples
//!
//! Programmatic configuration:
//!
//! ```
//! use staylock::config::{Config, ConfigBuilder, LockConfig};
//!
//! let custom = Config {
//!     lock: Some(LockConfig { date_bucket_days: Some(7) }),
//!     ..Default::default()
//! };
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(custom)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.date_bucket_days().map(|d| d.get()), Some(7));
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
pub use merger::ConfigMerger;
pub use schema::{
    BackoffConfig, Config, ConstraintsConfig, DatabaseSettings, LockConfig, OutputFormat,
    RetryConfig, RoomsConfig,
};
pub use validator::ConfigValidator;
