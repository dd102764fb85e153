//! Configuration loading and management.
//!
//! - [`types`]: Core config struct definitions (Config, ServerConfig, DatabaseConfig)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`validation`]: Startup checks over a loaded config

mod defaults;
mod listen;
mod types;
mod validation;

pub use listen::ListenConfig;
pub use types::{Config, ConfigError, DatabaseConfig, ServerConfig};
pub use validation::{ValidationError, validate};
