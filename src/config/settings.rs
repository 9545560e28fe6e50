//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub notifications: NotificationConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allow_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Authentication and identity provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Base URL of the external identity provider
    pub provider_url: String,
    /// API key sent to the identity provider
    pub provider_api_key: String,
    /// Identity provider request timeout
    pub provider_timeout_seconds: u64,
    /// HS256 secret used to sign session tokens
    pub session_secret: String,
    /// Session token lifetime
    pub session_ttl_hours: i64,
    /// Set the Secure attribute on the session cookie
    pub cookie_secure: bool,
    /// Login attempts allowed per client per window
    pub login_max_attempts: u32,
    /// Login rate-limit window
    pub login_window_seconds: u64,
}

/// Notification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SIXKUL").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::SixkulError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_allow_origins: vec![],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/sixkul".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            auth: AuthConfig {
                provider_url: "https://identity.example.sch.id".to_string(),
                provider_api_key: String::new(),
                provider_timeout_seconds: 5,
                session_secret: String::new(),
                session_ttl_hours: 24,
                cookie_secure: false,
                login_max_attempts: 5,
                login_window_seconds: 60,
            },
            notifications: NotificationConfig {
                default_language: "id".to_string(),
                supported_languages: vec!["id".to_string(), "en".to_string()],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/sixkul".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_toml_round_trip() {
        let settings = Settings::default();
        let rendered = toml::to_string(&settings).expect("settings should serialize");
        let parsed: Settings = toml::from_str(&rendered).expect("settings should parse back");

        assert_eq!(parsed.server.port, settings.server.port);
        assert_eq!(parsed.notifications.default_language, "id");
        assert_eq!(parsed.auth.login_max_attempts, settings.auth.login_max_attempts);
    }
}
