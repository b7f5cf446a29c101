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
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub weather: WeatherConfig,
    pub email: Option<EmailConfig>,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry_hours: i64,
}

/// Weather provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
}

/// SMTP email configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_file_size: String,
    pub max_files: u32,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub email_notifications: bool,
    pub rate_limiting: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("EVENTPLANNER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::EventPlannerError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/eventplanner".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "eventplanner:".to_string(),
                ttl_seconds: 3600,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_expiry_hours: 24,
            },
            weather: WeatherConfig {
                api_url: "https://api.openweathermap.org/data/2.5".to_string(),
                api_key: String::new(),
                timeout_seconds: 5,
                cache_ttl_seconds: 1800,
            },
            email: None,
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/eventplanner".to_string(),
                max_file_size: "10MB".to_string(),
                max_files: 5,
            },
            features: FeaturesConfig {
                email_notifications: false,
                rate_limiting: true,
            },
        }
    }
}
