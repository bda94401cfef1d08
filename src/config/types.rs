use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// History store and gazetteer connection
    pub database: DatabaseConfig,

    /// Place extraction settings
    pub gazetteer: GazetteerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Checks values the type system cannot
    pub fn validate(&self) -> Result<()> {
        self.database.backend()?;
        if self.database.max_connections == 0 {
            return Err(Error::InvalidConfiguration(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.gazetteer.country_code.trim().is_empty() {
            return Err(Error::InvalidConfiguration(
                "gazetteer.country_code must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Renders a commented sample configuration file
    pub fn sample_toml() -> Result<String> {
        let body = toml::to_string_pretty(&AppConfig::default())?;
        Ok(format!(
            "# anaphora-rs configuration\n\
             #\n\
             # Save as anaphora-rs.toml. Every key can be overridden from the\n\
             # environment, e.g. ANAPHORA_DATABASE__URL=postgres://localhost/dialogue\n\n{}",
            body
        ))
    }
}

/// Relational store holding conversation history and the gazetteer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL; the scheme selects the backend
    pub url: String,

    /// Maximum pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://anaphora.db".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// Backend selected by the URL scheme
    pub fn backend(&self) -> Result<DatabaseBackend> {
        DatabaseBackend::from_url(&self.url)
    }
}

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

impl DatabaseBackend {
    /// Infers the backend from a connection URL
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else {
            Err(Error::InvalidConfiguration(format!(
                "unsupported database url: {}",
                url
            )))
        }
    }
}

/// Gazetteer lookup scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteerConfig {
    /// Country every place match is restricted to
    pub country_code: String,
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self {
            country_code: "US".to_string(),
        }
    }
}

/// Logging configuration
///
/// With `console` and `file` both off, logging is disabled entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error or a full EnvFilter)
    pub level: String,

    /// Log to stderr
    pub console: bool,

    /// Log to rolling files under `log_dir`
    pub file: bool,

    /// Emit JSON lines instead of human-readable text
    pub json: bool,

    /// Directory for log files
    pub log_dir: PathBuf,

    /// File rotation
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            file: false,
            json: false,
            log_dir: PathBuf::from("logs"),
            rotation: LogRotation::Daily,
        }
    }
}

/// Log file rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}
