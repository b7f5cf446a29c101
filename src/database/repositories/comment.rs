//! Comment repository implementation

use crate::models::comment::{Comment, CommentWithAuthor};
use crate::utils::errors::EventPlannerError;
use chrono::Utc;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a comment on an event
    pub async fn create(
        &self,
        author_id: i64,
        event_id: i64,
        content: String,
        parent_comment_id: Option<i64>,
    ) -> Result<Comment, EventPlannerError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (content, author_id, event_id, parent_comment_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, content, author_id, event_id, parent_comment_id, is_edited, edited_at,
                      created_at, updated_at
            "#,
        )
        .bind(content)
        .bind(author_id)
        .bind(event_id)
        .bind(parent_comment_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Find comment by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, EventPlannerError> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, content, author_id, event_id, parent_comment_id, is_edited, edited_at, created_at, updated_at FROM comments WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Get an event's comments, newest first, with author details
    pub async fn list_for_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, EventPlannerError> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.content, c.author_id, u.name AS author_name, u.avatar AS author_avatar,
                   u.role AS author_role, c.event_id, c.parent_comment_id, c.is_edited, c.created_at
            FROM comments c
            INNER JOIN users u ON u.id = c.author_id
            WHERE c.event_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Delete comment
    pub async fn delete(&self, id: i64) -> Result<(), EventPlannerError> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove every comment on an event. Replies are removed by the same
    /// sweep, so no parent ordering is needed.
    pub async fn delete_all_for_event(&self, event_id: i64) -> Result<u64, EventPlannerError> {
        let result = sqlx::query("DELETE FROM comments WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
