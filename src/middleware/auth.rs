//! Authentication middleware
//!
//! Axum extractors that turn a bearer token into an authenticated user.
//! Handlers take `AuthUser` as an argument; requests without a valid token
//! are rejected before the handler runs. Role checks happen at the handler
//! level, where resource ownership is known.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::handlers::AppState;
use crate::models::user::User;
use crate::utils::errors::EventPlannerError;

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = EventPlannerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = state.services.auth_service.verify_token(token)?;

        let user = state
            .db
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = claims.sub, "Token refers to a user that no longer exists");
                EventPlannerError::Authentication("Invalid token - user does not exist".to_string())
            })?;

        debug!(user_id = user.id, "Authenticated request");
        Ok(AuthUser(user))
    }
}

/// Extract the bearer token from the Authorization header
fn bearer_token(parts: &Parts) -> Result<&str, EventPlannerError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| EventPlannerError::Authentication("Not authenticated - no token".to_string()))
}
