//! Application configuration
//!
//! Loaded with the `config` crate from defaults, an optional TOML file and
//! the environment.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, DatabaseBackend, DatabaseConfig, GazetteerConfig, LogRotation, LoggingConfig,
};
