//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, SixkulError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_notification_config(&settings.notifications)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(SixkulError::Config("Server host is required".to_string()));
    }

    if config.port == 0 {
        return Err(SixkulError::Config(
            "Server port must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(SixkulError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(SixkulError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(SixkulError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate authentication configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.provider_url.is_empty() {
        return Err(SixkulError::Config(
            "Identity provider URL is required".to_string(),
        ));
    }

    url::Url::parse(&config.provider_url)
        .map_err(|e| SixkulError::Config(format!("Invalid identity provider URL: {e}")))?;

    if config.session_secret.len() < 32 {
        return Err(SixkulError::Config(
            "Session secret must be at least 32 bytes".to_string(),
        ));
    }

    if config.session_ttl_hours <= 0 {
        return Err(SixkulError::Config(
            "Session TTL must be greater than 0".to_string(),
        ));
    }

    if config.provider_timeout_seconds == 0 {
        return Err(SixkulError::Config(
            "Identity provider timeout must be greater than 0".to_string(),
        ));
    }

    if config.login_max_attempts == 0 {
        return Err(SixkulError::Config(
            "Login rate limit must allow at least one attempt".to_string(),
        ));
    }

    Ok(())
}

/// Validate notification configuration
fn validate_notification_config(config: &super::NotificationConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(SixkulError::Config(
            "Default language is required".to_string(),
        ));
    }

    if config.supported_languages.is_empty() {
        return Err(SixkulError::Config(
            "At least one supported language is required".to_string(),
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(SixkulError::Config(
            "Default language must be in supported languages list".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SixkulError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SixkulError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.session_secret = "0123456789abcdef0123456789abcdef".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_short_session_secret_rejected() {
        let mut settings = valid_settings();
        settings.auth.session_secret = "too-short".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_bad_provider_url_rejected() {
        let mut settings = valid_settings();
        settings.auth.provider_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_connection_bounds() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        settings.database.max_connections = 10;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_default_language_must_be_supported() {
        let mut settings = valid_settings();
        settings.notifications.default_language = "fr".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
