//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod notification;
pub mod registration;
pub mod weather;

// Re-export commonly used services
pub use auth::{AuthService, Claims};
pub use notification::NotificationService;
pub use registration::RegistrationService;
pub use weather::WeatherService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub registration_service: RegistrationService,
    pub weather_service: WeatherService,
    pub notification_service: NotificationService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(
        settings: Settings,
        database: &DatabaseService,
        redis_client: redis::Client,
    ) -> Result<Self> {
        let notification_service = NotificationService::new(settings.clone())?;
        let auth_service = AuthService::new(database.users.clone(), settings.clone());
        let registration_service = RegistrationService::new(
            database.registrations.clone(),
            database.events.clone(),
            database.users.clone(),
            notification_service.clone(),
        );
        let weather_service = WeatherService::new(redis_client, settings)?;

        Ok(Self {
            auth_service,
            registration_service,
            weather_service,
            notification_service,
        })
    }
}
