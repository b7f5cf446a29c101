//! Router-level API tests
//!
//! These exercise the HTTP surface without live backing services: the
//! database pool is lazy and never connected, the weather provider is a
//! wiremock server, and a missing Redis simply degrades the cache.

mod helpers;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use eventplanner::config::Settings;
use eventplanner::database::DatabaseService;
use eventplanner::handlers::{build_router, AppState};
use eventplanner::middleware::{RateLimitConfig, RateLimiter};
use eventplanner::services::ServiceFactory;
use helpers::{init_test_env, test_settings, WeatherMockServer};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

fn test_server_with(settings: Settings, rate_limiter: RateLimiter) -> TestServer {
    init_test_env();
    let pool = PgPoolOptions::new()
        .connect_lazy(&settings.database.url)
        .expect("lazy pool");
    let db = DatabaseService::new(pool);
    let redis_client = redis::Client::open(settings.redis.url.clone()).expect("redis url");
    let services =
        ServiceFactory::new(settings.clone(), &db, redis_client).expect("service factory");

    let state = Arc::new(AppState {
        db,
        services,
        settings,
        rate_limiter,
    });

    TestServer::new(build_router(state)).expect("test server")
}

fn test_server(weather_api_url: &str) -> TestServer {
    test_server_with(test_settings(weather_api_url), RateLimiter::default())
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = test_server("http://127.0.0.1:9");

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_weather_requires_params() {
    let server = test_server("http://127.0.0.1:9");

    let response = server.get("/api/weather").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_weather_returns_forecast() {
    let mock = WeatherMockServer::start().await;
    let target = chrono::Utc::now() + chrono::Duration::days(2);
    mock.mock_forecast("Skopje", &[(target, 19.5)], 1).await;

    let server = test_server(&mock.api_url());
    let response = server
        .get("/api/weather")
        .add_query_param("location", "Skopje")
        .add_query_param("date", target.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["temperature"], 19.5);
    assert_eq!(body["data"]["location"], "Skopje");
}

#[tokio::test]
async fn test_weather_provider_failure_maps_to_bad_gateway() {
    let mock = WeatherMockServer::start().await;
    mock.mock_failure().await;

    let server = test_server(&mock.api_url());
    let response = server
        .get("/api/weather")
        .add_query_param("location", "Skopje")
        .add_query_param("date", "2026-02-10T18:00:00Z")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
}

#[tokio::test]
async fn test_protected_routes_reject_missing_token() {
    let server = test_server("http://127.0.0.1:9");

    let me = server.get("/api/auth/me").await;
    assert_eq!(me.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = me.json();
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let join = server.post("/api/events/1/registrations").await;
    assert_eq!(join.status_code(), StatusCode::UNAUTHORIZED);

    let cancel = server.delete("/api/events/1/registrations/me").await;
    assert_eq!(cancel.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let server = test_server("http://127.0.0.1:9");

    let response = server
        .get("/api/auth/me")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_static("Bearer not.a.token"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let limiter = RateLimiter::new(RateLimitConfig {
        max_requests: 2,
        window_duration: Duration::from_secs(60),
        burst_allowance: 0,
    });
    let server = test_server_with(test_settings("http://127.0.0.1:9"), limiter);

    assert_eq!(server.get("/health").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/health").await.status_code(), StatusCode::OK);

    let limited = server.get("/health").await;
    assert_eq!(limited.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = limited.json();
    assert_eq!(body["code"], "RATE_LIMITED");
}
