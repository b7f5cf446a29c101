//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: Option<i32>,
    /// Derived counter, recomputed from the registration ledger after every
    /// mutation. Never incremented in place.
    pub current_participants: i32,
    pub price: f64,
    pub organizer_id: i64,
    pub image: String,
    pub is_outside: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const EVENT_CATEGORIES: &[&str] = &["conference", "workshop", "social", "sports", "other"];
pub const EVENT_STATUSES: &[&str] = &["draft", "published", "cancelled", "completed"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: Option<i32>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub is_outside: Option<bool>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_participants: Option<i32>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub is_outside: Option<bool>,
    pub status: Option<String>,
}

/// Query parameters accepted by the event listing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl EventListQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}
