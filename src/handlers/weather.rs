//! Weather handler
//!
//! Unlike the embedded lookup on event detail, this endpoint surfaces
//! provider failures to the caller as 502.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::handlers::{ApiResponse, AppState};
use crate::models::weather::WeatherForecast;
use crate::utils::errors::{EventPlannerError, WeatherError};

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// GET /api/weather?location=Skopje&date=2026-02-10T18:00:00Z
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<ApiResponse<WeatherForecast>>, EventPlannerError> {
    let (location, date) = match (query.location, query.date) {
        (Some(location), Some(date)) if !location.trim().is_empty() => (location, date),
        _ => {
            return Err(EventPlannerError::InvalidInput(
                "Send location and date query params".to_string(),
            ))
        }
    };

    let forecast = state
        .services
        .weather_service
        .get_forecast(&location, date)
        .await
        .ok_or(EventPlannerError::Weather(WeatherError::ServiceUnavailable))?;

    Ok(ApiResponse::new(forecast))
}
