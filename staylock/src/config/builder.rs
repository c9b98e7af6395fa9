//! Layered configuration assembly.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builds a validated [`Config`] from the file, environment and
/// programmatic layers.
///
/// Precedence, highest first:
///
/// 1. Programmatic overrides ([`with_config`](Self::with_config))
/// 2. `STAYLOCK_*` environment variables
/// 3. `config.yaml` in the data directory
/// 4. Built-in defaults
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    data_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// Creates a builder that reads every layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `config.yaml` from `dir` instead of the resolved data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Ignores configuration files.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignores environment variables.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Applies `config` on top of every other layer.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Merges and validates the layers.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, an environment
    /// variable is malformed, or the merged result fails validation.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if !self.skip_files {
            let data_dir = match self.data_dir {
                Some(dir) => dir,
                None => crate::database::resolve_data_dir()?,
            };
            if let Some(source) = ConfigLoader::load_data_dir_config(&data_dir)? {
                ConfigMerger::merge_into(&mut config, &source.config);
            }
        }

        if !self.skip_env {
            let mut env_layer = Config::default();
            EnvironmentConfig::apply_overrides(&mut env_layer)?;
            ConfigMerger::merge_into(&mut config, &env_layer);
        }

        if let Some(ref overrides) = self.overrides {
            ConfigMerger::merge_into(&mut config, overrides);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
