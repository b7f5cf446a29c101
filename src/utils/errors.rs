//! Error handling for EventPlanner
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy, including the mapping of
//! domain errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Main error type for the EventPlanner application
#[derive(Error, Debug)]
pub enum EventPlannerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Weather provider error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Comment not found: {comment_id}")]
    CommentNotFound { comment_id: i64 },

    #[error("No registration for user {user_id} on event {event_id}")]
    RegistrationNotFound { user_id: i64, event_id: i64 },

    #[error("User {user_id} is already registered for event {event_id}")]
    DuplicateRegistration { user_id: i64, event_id: i64 },

    #[error("A user with email {email} already exists")]
    DuplicateEmail { email: String },

    #[error("Event {event_id} has reached its maximum number of participants")]
    CapacityExceeded { event_id: i64 },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Weather provider specific errors
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Weather API request failed: {0}")]
    RequestFailed(String),

    #[error("Weather API timeout")]
    Timeout,

    #[error("Invalid weather response: {0}")]
    InvalidResponse(String),

    #[error("Weather provider returned no forecast points")]
    EmptyForecast,

    #[error("Weather service unavailable")]
    ServiceUnavailable,
}

/// Result type alias for EventPlanner operations
pub type Result<T> = std::result::Result<T, EventPlannerError>;

impl EventPlannerError {
    /// HTTP status the error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            EventPlannerError::UserNotFound { .. }
            | EventPlannerError::EventNotFound { .. }
            | EventPlannerError::CommentNotFound { .. }
            | EventPlannerError::RegistrationNotFound { .. } => StatusCode::NOT_FOUND,
            EventPlannerError::CapacityExceeded { .. }
            | EventPlannerError::DuplicateRegistration { .. }
            | EventPlannerError::DuplicateEmail { .. }
            | EventPlannerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EventPlannerError::Authentication(_) => StatusCode::UNAUTHORIZED,
            EventPlannerError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            EventPlannerError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            EventPlannerError::Weather(_) => StatusCode::BAD_GATEWAY,
            EventPlannerError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-checkable error kind reported to API clients
    pub fn error_code(&self) -> &'static str {
        match self {
            EventPlannerError::UserNotFound { .. } => "USER_NOT_FOUND",
            EventPlannerError::EventNotFound { .. } => "EVENT_NOT_FOUND",
            EventPlannerError::CommentNotFound { .. } => "COMMENT_NOT_FOUND",
            EventPlannerError::RegistrationNotFound { .. } => "REGISTRATION_NOT_FOUND",
            EventPlannerError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            EventPlannerError::DuplicateRegistration { .. } => "DUPLICATE_REGISTRATION",
            EventPlannerError::DuplicateEmail { .. } => "DUPLICATE_EMAIL",
            EventPlannerError::InvalidInput(_) => "INVALID_INPUT",
            EventPlannerError::Authentication(_) => "UNAUTHENTICATED",
            EventPlannerError::PermissionDenied(_) => "FORBIDDEN",
            EventPlannerError::RateLimitExceeded => "RATE_LIMITED",
            EventPlannerError::Weather(_) => "UPSTREAM_UNAVAILABLE",
            EventPlannerError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            _ => "INTERNAL_ERROR",
        }
    }
}

/// JSON body for error responses
#[derive(Debug, serde::Serialize)]
struct ErrorBody {
    success: bool,
    code: &'static str,
    message: String,
}

impl IntoResponse for EventPlannerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Internal details are logged, never sent to the client.
        let message = if status.is_server_error() {
            tracing::error!(code = code, error = %self, "Request failed with internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            success: false,
            code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_client_statuses() {
        assert_eq!(
            EventPlannerError::EventNotFound { event_id: 7 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EventPlannerError::CapacityExceeded { event_id: 7 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EventPlannerError::DuplicateRegistration { user_id: 1, event_id: 7 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EventPlannerError::Authentication("no token".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            EventPlannerError::PermissionDenied("not the organizer".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_weather_errors_surface_as_bad_gateway() {
        let err = EventPlannerError::Weather(WeatherError::Timeout);
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), "UPSTREAM_UNAVAILABLE");
    }

    #[test]
    fn test_infrastructure_errors_are_internal() {
        let err = EventPlannerError::Config("missing jwt secret".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            EventPlannerError::RegistrationNotFound { user_id: 1, event_id: 2 }.error_code(),
            "REGISTRATION_NOT_FOUND"
        );
        assert_eq!(
            EventPlannerError::DuplicateEmail { email: "a@b.mk".to_string() }.error_code(),
            "DUPLICATE_EMAIL"
        );
    }
}
