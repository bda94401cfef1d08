use super::types::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

/// Configuration loader with builder pattern
///
/// Sources are layered: built-in defaults, then a TOML file, then
/// `ANAPHORA_`-prefixed environment variables (`__` separates sections).
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    load_env: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            config_file: None,
            load_env: false,
        }
    }

    /// Load configuration from an explicit file instead of the standard locations
    pub fn load_from_file<P: Into<PathBuf>>(mut self, path: Option<P>) -> Self {
        self.config_file = path.map(Into::into);
        self
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<AppConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(config_path) = &self.config_file {
            builder = builder.add_source(File::from(config_path.as_path()).required(true));
        } else {
            // Try to load from standard locations
            builder = builder
                .add_source(File::with_name("anaphora-rs").required(false))
                .add_source(File::with_name("config/anaphora-rs").required(false));
        }

        if self.load_env {
            builder = builder.add_source(
                Environment::with_prefix("ANAPHORA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate().context("Invalid configuration")?;

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
