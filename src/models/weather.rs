//! Weather forecast models
//!
//! Provider response structures follow the OpenWeatherMap 5-day forecast
//! payload; `WeatherForecast` is the normalized internal shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized forecast returned to API clients and stored in the cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    /// Location name as returned by the provider, not as requested
    pub location: String,
    pub date: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
    pub rain_probability: f64,
}

/// Cache envelope persisted in Redis alongside the storage-level TTL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedForecast {
    pub data: WeatherForecast,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Provider forecast response (subset of fields we consume)
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderForecastResponse {
    pub city: ProviderCity,
    pub list: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCity {
    pub name: String,
}

/// One point of the provider's forecast time series
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPoint {
    /// Unix timestamp of the forecast point
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<ForecastCondition>,
    pub wind: ForecastWind,
    /// Precipitation probability, absent on some points
    pub pop: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastWind {
    pub speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_response_deserialization() {
        let json = r#"{
            "city": {"name": "Skopje"},
            "list": [{
                "dt": 1739181600,
                "main": {"temp": 4.2, "feels_like": 1.8, "humidity": 71},
                "weather": [{"description": "light snow", "icon": "13d"}],
                "wind": {"speed": 3.6},
                "pop": 0.45
            }]
        }"#;

        let response: ProviderForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.city.name, "Skopje");
        assert_eq!(response.list.len(), 1);
        assert_eq!(response.list[0].main.humidity, 71);
        assert_eq!(response.list[0].pop, Some(0.45));
    }

    #[test]
    fn test_missing_pop_deserializes_as_none() {
        let json = r#"{
            "city": {"name": "Ohrid"},
            "list": [{
                "dt": 1739181600,
                "main": {"temp": 10.0, "feels_like": 9.0, "humidity": 50},
                "weather": [{"description": "clear sky", "icon": "01d"}],
                "wind": {"speed": 1.2}
            }]
        }"#;

        let response: ProviderForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.list[0].pop, None);
    }

    #[test]
    fn test_cached_forecast_round_trip() {
        let cached = CachedForecast {
            data: WeatherForecast {
                location: "Skopje".to_string(),
                date: Utc::now(),
                temperature: 21.5,
                feels_like: 20.9,
                humidity: 40,
                description: "few clouds".to_string(),
                icon: "02d".to_string(),
                wind_speed: 2.1,
                rain_probability: 0.0,
            },
            fetched_at: Utc::now(),
            expires_at: Utc::now(),
        };

        let serialized = serde_json::to_string(&cached).unwrap();
        let deserialized: CachedForecast = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.data, cached.data);
    }
}
