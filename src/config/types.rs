//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    DEFAULT_DATABASE_PATH, default_database_path, default_metrics_port, default_server_name,
};
use super::listen::ListenConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application identity.
    #[serde(default)]
    pub server: ServerConfig,
    /// REST API listener.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Database configuration.
    pub database: Option<DatabaseConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// SQLite path, falling back to `phonebook.db` when `[database]` is absent.
    pub fn database_path(&self) -> &str {
        self.database
            .as_ref()
            .map_or(DEFAULT_DATABASE_PATH, |db| db.path.as_str())
    }

    /// Metrics port, or `None` when the endpoint is disabled with `0`.
    pub fn metrics_port(&self) -> Option<u16> {
        match self.server.metrics_port {
            0 => None,
            port => Some(port),
        }
    }
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Application name, used in `X-<name>-alert` headers and alert messages.
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Prometheus metrics HTTP port (default: 9090, 0 disables).
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            metrics_port: default_metrics_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
}
