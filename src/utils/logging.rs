//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the EventPlanner application.

use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "eventplanner.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log registration ledger actions with structured data
pub fn log_registration_action(event_id: i64, user_id: i64, action: &str, participants: i64) {
    info!(
        event_id = event_id,
        user_id = user_id,
        action = action,
        current_participants = participants,
        "Registration action performed"
    );
}

/// Log weather cache lookups
pub fn log_weather_lookup(location: &str, cache_hit: bool) {
    debug!(
        location = location,
        cache_hit = cache_hit,
        "Weather forecast lookup"
    );
}

/// Log event management actions
pub fn log_event_action(event_id: i64, action: &str, user_id: i64) {
    info!(
        event_id = event_id,
        action = action,
        user_id = user_id,
        "Event action performed"
    );
}

