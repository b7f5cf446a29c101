//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    CommentRepository, DatabasePool, EventRepository, RegistrationRepository, UserRepository,
};
use crate::models::comment::{CommentWithAuthor, MAX_COMMENT_LEN};
use crate::models::event::Event;
use crate::utils::errors::EventPlannerError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub comments: CommentRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            comments: CommentRepository::new(pool),
        }
    }

    /// Load an event or fail with `EventNotFound`
    pub async fn require_event(&self, event_id: i64) -> Result<Event, EventPlannerError> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(EventPlannerError::EventNotFound { event_id })
    }

    /// Delete an event together with its registrations and comments.
    ///
    /// The ledger rows go first; once the event row is gone there is no
    /// counter left to recompute.
    pub async fn delete_event(&self, event_id: i64) -> Result<(), EventPlannerError> {
        let removed = self.registrations.delete_all_for_event(event_id).await?;
        let comments = self.comments.delete_all_for_event(event_id).await?;
        self.events.delete(event_id).await?;

        tracing::info!(
            event_id = event_id,
            registrations_removed = removed,
            comments_removed = comments,
            "Event deleted with its registrations and comments"
        );
        Ok(())
    }

    /// Create a comment after validating content and the optional parent
    pub async fn create_comment(
        &self,
        author_id: i64,
        event_id: i64,
        content: &str,
        parent_comment_id: Option<i64>,
    ) -> Result<CommentWithAuthor, EventPlannerError> {
        self.require_event(event_id).await?;

        let content = content.trim();
        if content.is_empty() {
            return Err(EventPlannerError::InvalidInput(
                "Comment content is required".to_string(),
            ));
        }
        if content.chars().count() > MAX_COMMENT_LEN {
            return Err(EventPlannerError::InvalidInput(format!(
                "Comment cannot be longer than {} characters",
                MAX_COMMENT_LEN
            )));
        }

        if let Some(parent_id) = parent_comment_id {
            let parent = self
                .comments
                .find_by_id(parent_id)
                .await?
                .ok_or(EventPlannerError::CommentNotFound { comment_id: parent_id })?;
            if parent.event_id != event_id {
                return Err(EventPlannerError::InvalidInput(
                    "Parent comment belongs to a different event".to_string(),
                ));
            }
        }

        let comment = self
            .comments
            .create(author_id, event_id, content.to_string(), parent_comment_id)
            .await?;

        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(EventPlannerError::UserNotFound { user_id: author_id })?;

        Ok(CommentWithAuthor {
            id: comment.id,
            content: comment.content,
            author_id: author.id,
            author_name: author.name,
            author_avatar: author.avatar,
            author_role: author.role,
            event_id: comment.event_id,
            parent_comment_id: comment.parent_comment_id,
            is_edited: comment.is_edited,
            created_at: comment.created_at,
        })
    }
}
