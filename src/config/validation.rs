//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{EventPlannerError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_auth_config(&settings.auth)?;
    validate_weather_config(&settings.weather)?;
    validate_logging_config(&settings.logging)?;

    if let Some(ref email_config) = settings.email {
        validate_email_config(email_config)?;
    }

    Ok(())
}

/// Validate HTTP server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(EventPlannerError::Config(
            "Server host is required".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(EventPlannerError::Config(
            "Server port must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventPlannerError::Config(
            "Database URL is required".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(EventPlannerError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(EventPlannerError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventPlannerError::Config(
            "Redis URL is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate JWT authentication configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.is_empty() {
        return Err(EventPlannerError::Config(
            "JWT secret is required".to_string(),
        ));
    }

    if config.token_expiry_hours <= 0 {
        return Err(EventPlannerError::Config(
            "Token expiry must be greater than 0 hours".to_string(),
        ));
    }

    Ok(())
}

/// Validate weather provider configuration
fn validate_weather_config(config: &super::WeatherConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(EventPlannerError::Config(
            "Weather API URL is required".to_string(),
        ));
    }

    url::Url::parse(&config.api_url)
        .map_err(|e| EventPlannerError::Config(format!("Invalid weather API URL: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(EventPlannerError::Config(
            "Weather timeout must be greater than 0".to_string(),
        ));
    }

    if config.cache_ttl_seconds == 0 {
        return Err(EventPlannerError::Config(
            "Weather cache TTL must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate SMTP email configuration
fn validate_email_config(config: &super::EmailConfig) -> Result<()> {
    if config.smtp_host.is_empty() {
        return Err(EventPlannerError::Config(
            "SMTP host is required".to_string(),
        ));
    }

    if config.from_address.is_empty() {
        return Err(EventPlannerError::Config(
            "Email from address is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventPlannerError::Config(
            "Log level is required".to_string(),
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EventPlannerError::Config(format!(
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
        settings.auth.jwt_secret = "test-secret".to_string();
        settings.weather.api_key = "test-key".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.auth.jwt_secret = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_weather_url_rejected() {
        let mut settings = valid_settings();
        settings.weather.api_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_cache_ttl_rejected() {
        let mut settings = valid_settings();
        settings.weather.cache_ttl_seconds = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_pool_bounds_checked() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        assert!(validate_settings(&settings).is_err());
    }
}
