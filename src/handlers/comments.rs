//! Comment handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::handlers::{ApiMessage, ApiResponse, AppState};
use crate::middleware::AuthUser;
use crate::models::comment::{CommentWithAuthor, CreateCommentRequest};
use crate::utils::errors::EventPlannerError;

/// GET /api/events/:id/comments
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CommentWithAuthor>>>, EventPlannerError> {
    state.db.require_event(event_id).await?;
    let comments = state.db.comments.list_for_event(event_id).await?;

    Ok(ApiResponse::new(comments))
}

/// POST /api/events/:id/comments
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<i64>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentWithAuthor>>), EventPlannerError> {
    let comment = state
        .db
        .create_comment(user.id, event_id, &request.content, request.parent_comment_id)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::new(comment)))
}

/// DELETE /api/comments/:id
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<Json<ApiMessage>, EventPlannerError> {
    let comment = state
        .db
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or(EventPlannerError::CommentNotFound { comment_id })?;

    if comment.author_id != user.id && !user.is_admin() {
        return Err(EventPlannerError::PermissionDenied(
            "Only the author or an admin can delete a comment".to_string(),
        ));
    }

    state.db.comments.delete(comment_id).await?;

    Ok(ApiMessage::new("Deleted"))
}
