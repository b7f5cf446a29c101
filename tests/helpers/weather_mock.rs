//! Mock weather provider
//!
//! Wraps a wiremock server that answers like the OpenWeatherMap forecast
//! endpoint, so weather gateway tests never touch the real provider.

use chrono::{DateTime, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct WeatherMockServer {
    pub server: MockServer,
}

impl WeatherMockServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Provider base URL to point the weather service at
    pub fn api_url(&self) -> String {
        self.server.uri()
    }

    /// Mount a forecast response for a location with the given
    /// (timestamp, temperature) points. `expected_calls` asserts how often
    /// the provider may be hit; the assertion fires when the server drops.
    pub async fn mock_forecast(
        &self,
        city: &str,
        points: &[(DateTime<Utc>, f64)],
        expected_calls: u64,
    ) {
        let list: Vec<_> = points
            .iter()
            .map(|(timestamp, temp)| {
                json!({
                    "dt": timestamp.timestamp(),
                    "main": {"temp": temp, "feels_like": temp - 1.5, "humidity": 64},
                    "weather": [{"description": "scattered clouds", "icon": "03d"}],
                    "wind": {"speed": 3.1},
                    "pop": 0.2
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", city))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": {"name": city},
                "list": list
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Mount a provider failure (HTTP 500)
    pub async fn mock_failure(&self) {
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
            .mount(&self.server)
            .await;
    }

    /// Mount a 200 response whose body is not a forecast payload
    pub async fn mock_malformed(&self) {
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"not": "a forecast"})))
            .mount(&self.server)
            .await;
    }
}
