//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    pub event_id: i64,
    pub parent_comment_id: Option<i64>,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment joined with its author's public fields, as returned by listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    pub author_name: String,
    pub author_avatar: String,
    pub author_role: String,
    pub event_id: i64,
    pub parent_comment_id: Option<i64>,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_comment_id: Option<i64>,
}

pub const MAX_COMMENT_LEN: usize = 1000;
