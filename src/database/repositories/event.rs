//! Event repository implementation

use crate::models::event::{CreateEventRequest, Event, EventListQuery, UpdateEventRequest};
use crate::utils::errors::EventPlannerError;
use chrono::Utc;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(
        &self,
        organizer_id: i64,
        request: CreateEventRequest,
    ) -> Result<Event, EventPlannerError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, category, location, event_date, end_date,
                                max_participants, price, organizer_id, image, is_outside, status,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
            RETURNING id, title, description, category, location, event_date, end_date,
                      max_participants, current_participants, price, organizer_id, image,
                      is_outside, status, created_at, updated_at
            "#,
        )
        .bind(request.title)
        .bind(request.description)
        .bind(request.category.unwrap_or_else(|| "other".to_string()))
        .bind(request.location)
        .bind(request.event_date)
        .bind(request.end_date)
        .bind(request.max_participants)
        .bind(request.price.unwrap_or(0.0))
        .bind(organizer_id)
        .bind(request.image.unwrap_or_else(|| "default-event.jpg".to_string()))
        .bind(request.is_outside.unwrap_or(false))
        .bind(request.status.unwrap_or_else(|| "draft".to_string()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, EventPlannerError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, title, description, category, location, event_date, end_date, max_participants, current_participants, price, organizer_id, image, is_outside, status, created_at, updated_at FROM events WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event
    pub async fn update(
        &self,
        id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event, EventPlannerError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                location = COALESCE($5, location),
                event_date = COALESCE($6, event_date),
                end_date = COALESCE($7, end_date),
                max_participants = COALESCE($8, max_participants),
                price = COALESCE($9, price),
                image = COALESCE($10, image),
                is_outside = COALESCE($11, is_outside),
                status = COALESCE($12, status),
                updated_at = $13
            WHERE id = $1
            RETURNING id, title, description, category, location, event_date, end_date,
                      max_participants, current_participants, price, organizer_id, image,
                      is_outside, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.category)
        .bind(request.location)
        .bind(request.event_date)
        .bind(request.end_date)
        .bind(request.max_participants)
        .bind(request.price)
        .bind(request.image)
        .bind(request.is_outside)
        .bind(request.status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event
    pub async fn delete(&self, id: i64) -> Result<(), EventPlannerError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List events with pagination, optional category filter and text search
    pub async fn list(&self, query: &EventListQuery) -> Result<Vec<Event>, EventPlannerError> {
        let search = query.search.as_ref().map(|s| format!("%{}%", s));
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, category, location, event_date, end_date,
                   max_participants, current_participants, price, organizer_id, image,
                   is_outside, status, created_at, updated_at
            FROM events
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR title ILIKE $2 OR description ILIKE $2 OR location ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&query.category)
        .bind(&search)
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Count events matching the same filters as `list`
    pub async fn count_filtered(&self, query: &EventListQuery) -> Result<i64, EventPlannerError> {
        let search = query.search.as_ref().map(|s| format!("%{}%", s));
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM events
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR title ILIKE $2 OR description ILIKE $2 OR location ILIKE $2)
            "#,
        )
        .bind(&query.category)
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

}
