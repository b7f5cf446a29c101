//! Authentication handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::handlers::{ApiResponse, AppState};
use crate::middleware::AuthUser;
use crate::models::user::PublicUser;
use crate::utils::errors::EventPlannerError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), EventPlannerError> {
    let (user, token) = state
        .services
        .auth_service
        .register(&request.name, &request.email, &request.password)
        .await?;

    // Welcome mail is a side effect; the signup result never waits on it.
    let notifications = state.services.notification_service.clone();
    let mail_user = user.clone();
    tokio::spawn(async move {
        notifications.send_welcome(&mail_user).await;
    });

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token,
            user: user.public(),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, EventPlannerError> {
    let (user, token) = state
        .services
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(AuthResponse {
        success: true,
        token,
        user: user.public(),
    }))
}

/// GET /api/auth/me
pub async fn me(AuthUser(user): AuthUser) -> Json<ApiResponse<PublicUser>> {
    ApiResponse::new(user.public())
}
