//! Test data helpers
//!
//! Builders for settings and seed rows used across integration tests.

use chrono::{Duration, Utc};
use eventplanner::config::Settings;
use eventplanner::database::DatabaseService;
use eventplanner::models::event::{CreateEventRequest, Event};
use eventplanner::models::user::{CreateUserRequest, User};

/// Settings wired for tests: local backing services, a mock weather
/// provider URL and a unique redis prefix per call so parallel test runs
/// never share cache keys.
pub fn test_settings(weather_api_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = "integration-test-secret".to_string();
    settings.weather.api_url = weather_api_url.to_string();
    settings.weather.api_key = "test-key".to_string();
    settings.weather.cache_ttl_seconds = 120;
    settings.redis.prefix = format!("eventplanner-test:{}:", uuid::Uuid::new_v4());
    settings
}

/// Create a user with a unique email
pub async fn seed_user(db: &DatabaseService, name: &str) -> User {
    db.users
        .create(CreateUserRequest {
            name: name.to_string(),
            email: format!("{}-{}@example.com", name.to_lowercase(), uuid::Uuid::new_v4()),
            password_hash: "$2b$04$testhashtesthashtesthas".to_string(),
            role: None,
        })
        .await
        .expect("failed to seed user")
}

/// Create a published event owned by `organizer_id`
pub async fn seed_event(
    db: &DatabaseService,
    organizer_id: i64,
    max_participants: Option<i32>,
) -> Event {
    db.events
        .create(
            organizer_id,
            CreateEventRequest {
                title: "Open Air Dance Night".to_string(),
                description: "An evening of social dancing in the park".to_string(),
                category: Some("social".to_string()),
                location: "Skopje".to_string(),
                event_date: Utc::now() + Duration::days(7),
                end_date: Utc::now() + Duration::days(7) + Duration::hours(4),
                max_participants,
                price: Some(5.0),
                image: None,
                is_outside: Some(true),
                status: Some("published".to_string()),
            },
        )
        .await
        .expect("failed to seed event")
}
