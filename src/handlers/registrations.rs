//! Registration handlers
//!
//! The HTTP surface of the registration ledger. Join and cancel are
//! terminal for the request: ledger errors are reported to the caller with
//! a stable machine-checkable kind.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::handlers::{ApiMessage, ApiResponse, AppState};
use crate::middleware::AuthUser;
use crate::models::registration::{ParticipateRequest, Registration};
use crate::utils::errors::EventPlannerError;

/// POST /api/events/:id/registrations
pub async fn participate(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<i64>,
    request: Option<Json<ParticipateRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<Registration>>), EventPlannerError> {
    let request = request.map(|Json(body)| body).unwrap_or_default();

    let registration = state
        .services
        .registration_service
        .participate(user.id, event_id, request)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(registration)))
}

/// GET /api/events/:id/registrations/me
///
/// Always succeeds for an authenticated caller; "not registered" is a
/// `null` payload, not an error.
pub async fn my_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<i64>,
) -> Result<Json<ApiResponse<Option<Registration>>>, EventPlannerError> {
    let registration = state
        .services
        .registration_service
        .my_status(user.id, event_id)
        .await?;

    Ok(ApiResponse::new(registration))
}

/// DELETE /api/events/:id/registrations/me
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<i64>,
) -> Result<Json<ApiMessage>, EventPlannerError> {
    state
        .services
        .registration_service
        .cancel(user.id, event_id)
        .await?;

    Ok(ApiMessage::new("Cancelled"))
}
