//! Weather cache gateway implementation
//!
//! This service fronts the external forecast provider with a read-through
//! Redis cache keyed by (location, date), including HTTP client setup with
//! a bounded timeout, nearest-point selection, payload normalization and
//! TTL-based expiry. Provider and cache failures degrade to "no forecast";
//! weather data is supplementary, never load-bearing.

use chrono::{DateTime, Duration, Utc};
use redis::AsyncCommands;
use reqwest::Client;
use std::time::Duration as StdDuration;
use tracing::{debug, warn};

use crate::config::settings::Settings;
use crate::models::weather::{
    CachedForecast, ForecastPoint, ProviderForecastResponse, WeatherForecast,
};
use crate::utils::errors::{EventPlannerError, Result, WeatherError};
use crate::utils::helpers::normalize_location;
use crate::utils::logging::log_weather_lookup;

/// Weather service for cached forecast lookups
#[derive(Clone)]
#[derive(Debug)]
pub struct WeatherService {
    client: Client,
    redis_client: redis::Client,
    settings: Settings,
}

impl WeatherService {
    /// Create a new WeatherService instance
    pub fn new(redis_client: redis::Client, settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(settings.weather.timeout_seconds))
            .user_agent("EventPlanner/1.0")
            .build()
            .map_err(EventPlannerError::Http)?;

        Ok(Self {
            client,
            redis_client,
            settings,
        })
    }

    /// Get the forecast for a location and date.
    ///
    /// Returns `None` when the provider is unreachable, answers with an
    /// error, or yields an unusable payload. Callers must treat a missing
    /// forecast as a normal, displayable state.
    pub async fn get_forecast(
        &self,
        location: &str,
        date: DateTime<Utc>,
    ) -> Option<WeatherForecast> {
        let key = self.cache_key(location, date);

        match self.get_cached_forecast(&key).await {
            Ok(Some(cached)) => {
                log_weather_lookup(location, true);
                return Some(cached.data);
            }
            Ok(None) => {}
            Err(e) => {
                // A broken cache is treated as a miss, not a failure.
                warn!(location = location, error = %e, "Weather cache read failed");
            }
        }
        log_weather_lookup(location, false);

        let forecast = match self.fetch_forecast(location, date).await {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!(location = location, error = %e, "Weather provider call failed");
                return None;
            }
        };

        if let Err(e) = self.cache_forecast(&key, &forecast).await {
            warn!(location = location, error = %e, "Failed to cache weather forecast");
        }

        Some(forecast)
    }

    /// Cache key for a normalized (location, date) pair
    fn cache_key(&self, location: &str, date: DateTime<Utc>) -> String {
        format!(
            "{}weather:{}:{}",
            self.settings.redis.prefix,
            normalize_location(location),
            date.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }

    /// Get cached forecast from Redis
    async fn get_cached_forecast(&self, key: &str) -> Result<Option<CachedForecast>> {
        let mut conn = self
            .redis_client
            .get_async_connection()
            .await
            .map_err(EventPlannerError::Redis)?;

        let cached_data: Option<String> = conn.get(key).await.map_err(EventPlannerError::Redis)?;

        if let Some(data) = cached_data {
            match serde_json::from_str::<CachedForecast>(&data) {
                Ok(cached) => {
                    // Redis expires the key on its own; the stored expiry is
                    // double-checked so a lagging sweep never serves stale data.
                    if cached.expires_at > Utc::now() {
                        return Ok(Some(cached));
                    }
                    let _: () = conn.del(key).await.map_err(EventPlannerError::Redis)?;
                }
                Err(e) => {
                    warn!(key = key, error = %e, "Failed to deserialize cached forecast");
                    // Remove corrupted cache entry
                    let _: () = conn.del(key).await.map_err(EventPlannerError::Redis)?;
                }
            }
        }

        Ok(None)
    }

    /// Cache forecast in Redis with the configured TTL
    async fn cache_forecast(&self, key: &str, forecast: &WeatherForecast) -> Result<()> {
        let mut conn = self
            .redis_client
            .get_async_connection()
            .await
            .map_err(EventPlannerError::Redis)?;

        let ttl = self.settings.weather.cache_ttl_seconds;
        let now = Utc::now();
        let cached = CachedForecast {
            data: forecast.clone(),
            fetched_at: now,
            expires_at: now + Duration::seconds(ttl as i64),
        };
        let serialized = serde_json::to_string(&cached).map_err(EventPlannerError::Serialization)?;

        let _: () = conn
            .set_ex(key, serialized, ttl)
            .await
            .map_err(EventPlannerError::Redis)?;

        debug!(key = key, ttl = ttl, "Cached weather forecast");
        Ok(())
    }

    /// Make the actual provider API request and normalize the result
    async fn fetch_forecast(
        &self,
        location: &str,
        date: DateTime<Utc>,
    ) -> Result<WeatherForecast> {
        let url = format!("{}/forecast", self.settings.weather.api_url);

        debug!(location = location, url = %url, "Making weather API request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.settings.weather.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EventPlannerError::Weather(WeatherError::Timeout)
                } else if e.is_connect() {
                    EventPlannerError::Weather(WeatherError::ServiceUnavailable)
                } else {
                    EventPlannerError::Weather(WeatherError::RequestFailed(e.to_string()))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EventPlannerError::Weather(WeatherError::RequestFailed(
                format!("HTTP {}: {}", status, error_text),
            )));
        }

        let provider_response: ProviderForecastResponse = response
            .json()
            .await
            .map_err(|e| EventPlannerError::Weather(WeatherError::InvalidResponse(e.to_string())))?;

        let point = closest_point(&provider_response.list, date)
            .ok_or(EventPlannerError::Weather(WeatherError::EmptyForecast))?;

        Ok(normalize_point(&provider_response.city.name, date, point))
    }
}

/// Select the forecast point nearest to the requested date.
///
/// Ties resolve to the first point in provider order.
pub fn closest_point(points: &[ForecastPoint], target: DateTime<Utc>) -> Option<&ForecastPoint> {
    let target_ts = target.timestamp();
    points
        .iter()
        .min_by_key(|point| (point.dt - target_ts).abs())
}

/// Normalize one provider point into the internal forecast shape
fn normalize_point(
    provider_location: &str,
    date: DateTime<Utc>,
    point: &ForecastPoint,
) -> WeatherForecast {
    let condition = point.weather.first();

    WeatherForecast {
        location: provider_location.to_string(),
        date,
        temperature: point.main.temp,
        feels_like: point.main.feels_like,
        humidity: point.main.humidity,
        description: condition.map(|c| c.description.clone()).unwrap_or_default(),
        icon: condition.map(|c| c.icon.clone()).unwrap_or_default(),
        wind_speed: point.wind.speed,
        rain_probability: point.pop.unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weather::{ForecastCondition, ForecastMain, ForecastWind};
    use chrono::TimeZone;

    fn point(dt: i64, temp: f64) -> ForecastPoint {
        ForecastPoint {
            dt,
            main: ForecastMain {
                temp,
                feels_like: temp - 1.0,
                humidity: 60,
            },
            weather: vec![ForecastCondition {
                description: "scattered clouds".to_string(),
                icon: "03d".to_string(),
            }],
            wind: ForecastWind { speed: 2.5 },
            pop: None,
        }
    }

    #[test]
    fn test_closest_point_picks_nearest_neighbor() {
        let target = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        // Points at target - 3h, target + 1h, target + 5h
        let points = vec![
            point(target.timestamp() - 3 * 3600, 1.0),
            point(target.timestamp() + 3600, 2.0),
            point(target.timestamp() + 5 * 3600, 3.0),
        ];

        let selected = closest_point(&points, target).unwrap();
        assert_eq!(selected.main.temp, 2.0);
    }

    #[test]
    fn test_closest_point_tie_resolves_to_first() {
        let target = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let points = vec![
            point(target.timestamp() - 3600, 1.0),
            point(target.timestamp() + 3600, 2.0),
        ];

        let selected = closest_point(&points, target).unwrap();
        assert_eq!(selected.main.temp, 1.0);
    }

    #[test]
    fn test_closest_point_empty_series() {
        let target = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert!(closest_point(&[], target).is_none());
    }

    #[test]
    fn test_normalize_point_defaults_rain_probability() {
        let target = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let p = point(target.timestamp(), 15.0);

        let forecast = normalize_point("Skopje", target, &p);
        assert_eq!(forecast.location, "Skopje");
        assert_eq!(forecast.rain_probability, 0.0);
        assert_eq!(forecast.description, "scattered clouds");
        assert_eq!(forecast.icon, "03d");
    }
}
