//! HTTP handlers module
//!
//! Route handlers for the REST API, the shared application state and the
//! router wiring everything together.

pub mod auth;
pub mod comments;
pub mod events;
pub mod health;
pub mod registrations;
pub mod weather;

use axum::routing::{delete, get, post};
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::middleware::{rate_limit_middleware, request_logging, RateLimiter};
use crate::services::ServiceFactory;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub settings: Settings,
    pub rate_limiter: RateLimiter,
}

/// Success envelope returned by the API
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> axum::Json<Self> {
        axum::Json(Self {
            success: true,
            data,
        })
    }
}

/// Message-only success envelope for deletes and cancels
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> axum::Json<Self> {
        axum::Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/events", get(events::list_events).post(events::create_event))
        .route(
            "/api/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/api/events/:id/registrations",
            post(registrations::participate),
        )
        .route(
            "/api/events/:id/registrations/me",
            get(registrations::my_status).delete(registrations::cancel),
        )
        .route(
            "/api/events/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/api/comments/:id", delete(comments::delete_comment))
        .route("/api/weather", get(weather::get_weather))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(axum::middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
