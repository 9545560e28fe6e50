//! Configuration management
//!
//! Settings are loaded from an optional `config.toml` plus `SIXKUL`-prefixed
//! environment variables, then validated before the server starts.

pub mod settings;
pub mod validation;

pub use settings::{
    AuthConfig, DatabaseConfig, LoggingConfig, NotificationConfig, ServerConfig, Settings,
};
