//! Event handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::handlers::{ApiMessage, ApiResponse, AppState};
use crate::middleware::AuthUser;
use crate::models::comment::CommentWithAuthor;
use crate::models::event::{
    CreateEventRequest, Event, EventListQuery, UpdateEventRequest, EVENT_CATEGORIES,
    EVENT_STATUSES,
};
use crate::models::user::User;
use crate::models::weather::WeatherForecast;
use crate::utils::errors::EventPlannerError;
use crate::utils::logging::log_event_action;

/// Whether the user may modify the event
fn can_edit_event(event: &Event, user: &User) -> bool {
    user.is_admin() || event.organizer_id == user.id
}

#[derive(Debug, Serialize)]
pub struct PageMarker {
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Default, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageMarker>,
}

#[derive(Debug, Serialize)]
pub struct EventPage {
    pub success: bool,
    pub count: usize,
    pub total: i64,
    pub pagination: Pagination,
    pub data: Vec<Event>,
}

/// Event detail with its comments and, for outdoor events, the forecast
#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub comments: Vec<CommentWithAuthor>,
    pub weather_forecast: Option<WeatherForecast>,
}

/// GET /api/events
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<EventPage>, EventPlannerError> {
    let events = state.db.events.list(&query).await?;
    let total = state.db.events.count_filtered(&query).await?;

    let page = query.page();
    let limit = query.limit();
    let mut pagination = Pagination::default();
    if page * limit < total {
        pagination.next = Some(PageMarker {
            page: page + 1,
            limit,
        });
    }
    if page > 1 {
        pagination.prev = Some(PageMarker {
            page: page - 1,
            limit,
        });
    }

    Ok(Json(EventPage {
        success: true,
        count: events.len(),
        total,
        pagination,
        data: events,
    }))
}

/// GET /api/events/:id
///
/// Weather lookup failures degrade to a `null` forecast; event detail
/// retrieval never fails because of the provider.
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> Result<Json<ApiResponse<EventDetail>>, EventPlannerError> {
    let event = state.db.require_event(event_id).await?;
    let comments = state.db.comments.list_for_event(event_id).await?;

    let weather_forecast = if event.is_outside {
        state
            .services
            .weather_service
            .get_forecast(&event.location, event.event_date)
            .await
    } else {
        None
    };

    Ok(ApiResponse::new(EventDetail {
        event,
        comments,
        weather_forecast,
    }))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Event>>), EventPlannerError> {
    validate_event_request(&request)?;

    let event = state.db.events.create(user.id, request).await?;
    log_event_action(event.id, "create", user.id);

    Ok((StatusCode::CREATED, ApiResponse::new(event)))
}

/// PUT /api/events/:id
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<i64>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<ApiResponse<Event>>, EventPlannerError> {
    let event = state.db.require_event(event_id).await?;
    if !can_edit_event(&event, &user) {
        return Err(EventPlannerError::PermissionDenied(
            "You cannot edit this event".to_string(),
        ));
    }

    if let Some(ref category) = request.category {
        validate_category(category)?;
    }
    if let Some(ref status) = request.status {
        validate_status(status)?;
    }

    let updated = state.db.events.update(event_id, request).await?;
    log_event_action(event_id, "update", user.id);

    // Participants learn about the change by mail, off the request path
    if state.services.notification_service.is_enabled() {
        let users = state
            .db
            .users
            .find_registered_for_event(event_id)
            .await
            .unwrap_or_default();
        let notifications = state.services.notification_service.clone();
        let changed = updated.clone();
        tokio::spawn(async move {
            notifications.send_event_update(&users, &changed).await;
        });
    }

    Ok(ApiResponse::new(updated))
}

/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<i64>,
) -> Result<Json<ApiMessage>, EventPlannerError> {
    let event = state.db.require_event(event_id).await?;
    if !can_edit_event(&event, &user) {
        return Err(EventPlannerError::PermissionDenied(
            "You cannot delete this event".to_string(),
        ));
    }

    state.db.delete_event(event_id).await?;
    log_event_action(event_id, "delete", user.id);

    Ok(ApiMessage::new("Event deleted"))
}

fn validate_event_request(request: &CreateEventRequest) -> Result<(), EventPlannerError> {
    if request.title.trim().chars().count() < 3 {
        return Err(EventPlannerError::InvalidInput(
            "Title must be at least 3 characters".to_string(),
        ));
    }
    if request.description.trim().chars().count() < 10 {
        return Err(EventPlannerError::InvalidInput(
            "Description must be at least 10 characters".to_string(),
        ));
    }
    if request.location.trim().is_empty() {
        return Err(EventPlannerError::InvalidInput(
            "Location is required".to_string(),
        ));
    }
    if request.end_date < request.event_date {
        return Err(EventPlannerError::InvalidInput(
            "End date cannot be before the start date".to_string(),
        ));
    }
    if let Some(max_participants) = request.max_participants {
        if max_participants < 1 {
            return Err(EventPlannerError::InvalidInput(
                "There must be room for at least 1 participant".to_string(),
            ));
        }
    }
    if let Some(price) = request.price {
        if price < 0.0 {
            return Err(EventPlannerError::InvalidInput(
                "Price cannot be negative".to_string(),
            ));
        }
    }
    if let Some(ref category) = request.category {
        validate_category(category)?;
    }
    if let Some(ref status) = request.status {
        validate_status(status)?;
    }

    Ok(())
}

fn validate_category(category: &str) -> Result<(), EventPlannerError> {
    if !EVENT_CATEGORIES.contains(&category) {
        return Err(EventPlannerError::InvalidInput(format!(
            "Unknown category: {}. Valid categories: {:?}",
            category, EVENT_CATEGORIES
        )));
    }
    Ok(())
}

fn validate_status(status: &str) -> Result<(), EventPlannerError> {
    if !EVENT_STATUSES.contains(&status) {
        return Err(EventPlannerError::InvalidInput(format!(
            "Unknown status: {}. Valid statuses: {:?}",
            status, EVENT_STATUSES
        )));
    }
    Ok(())
}
