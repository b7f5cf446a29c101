//! Registration ledger implementation
//!
//! Tracks one registration per (user, event) pair, enforces event capacity
//! and keeps `events.current_participants` equal to the authoritative count
//! of active registrations.
//!
//! `participate` and `cancel` each run in a single transaction holding a
//! `FOR UPDATE` row lock on the event, so concurrent sign-ups for the same
//! event are serialized and the capacity check cannot overshoot. The UNIQUE
//! (user_id, event_id) index remains the backstop against double-joining.

use crate::models::event::Event;
use crate::models::registration::{Registration, RegistrationStatus};
use crate::utils::errors::EventPlannerError;
use crate::utils::logging::log_registration_action;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};

/// Postgres error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a user for an event.
    ///
    /// Fails with `EventNotFound` if the event does not exist,
    /// `CapacityExceeded` when the event is full and `DuplicateRegistration`
    /// when the user already holds a registration. On success the event's
    /// participant counter has been recomputed from the ledger.
    pub async fn participate(
        &self,
        user_id: i64,
        event_id: i64,
        special_requirements: Option<String>,
    ) -> Result<Registration, EventPlannerError> {
        let mut tx = self.pool.begin().await?;

        // Lock the event row; this is the serialization point for capacity.
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, title, description, category, location, event_date, end_date, max_participants, current_participants, price, organizer_id, image, is_outside, status, created_at, updated_at FROM events WHERE id = $1 FOR UPDATE"
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EventPlannerError::EventNotFound { event_id })?;

        if let Some(max_participants) = event.max_participants {
            let active = count_active(&mut tx, event_id).await?;
            if active >= max_participants as i64 {
                return Err(EventPlannerError::CapacityExceeded { event_id });
            }
        }

        let now = Utc::now();
        // Registrations are created confirmed; pending stays a legal stored
        // value but nothing produces it on this path.
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (user_id, event_id, status, payment_status, payment_amount,
                                       special_requirements, registration_date, created_at, updated_at)
            VALUES ($1, $2, $3, 'pending', $4, $5, $6, $6, $6)
            RETURNING id, user_id, event_id, status, payment_status, payment_amount,
                      special_requirements, registration_date, check_in_time, check_out_time,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .bind(RegistrationStatus::Confirmed.as_str())
        .bind(event.price)
        .bind(special_requirements)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                EventPlannerError::DuplicateRegistration { user_id, event_id }
            }
            _ => EventPlannerError::Database(e),
        })?;

        let participants = recompute_participants(&mut tx, event_id).await?;
        tx.commit().await?;

        log_registration_action(event_id, user_id, "participate", participants);
        Ok(registration)
    }

    /// Cancel a user's registration by deleting the row.
    ///
    /// A second cancel for the same pair yields `RegistrationNotFound`;
    /// callers treat that as "already cancelled".
    pub async fn cancel(&self, user_id: i64, event_id: i64) -> Result<(), EventPlannerError> {
        let mut tx = self.pool.begin().await?;

        // Acquire the event lock in the same order as participate. The event
        // may already be gone when a cancel races its deletion; then only the
        // row delete below runs.
        let _: Option<(i64,)> = sqlx::query_as("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM registrations WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EventPlannerError::RegistrationNotFound { user_id, event_id });
        }

        let participants = recompute_participants(&mut tx, event_id).await?;
        tx.commit().await?;

        log_registration_action(event_id, user_id, "cancel", participants);
        Ok(())
    }

    /// Find the active registration for a (user, event) pair
    pub async fn find_by_user_and_event(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Registration>, EventPlannerError> {
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT id, user_id, event_id, status, payment_status, payment_amount, special_requirements, registration_date, check_in_time, check_out_time, created_at, updated_at FROM registrations WHERE user_id = $1 AND event_id = $2"
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Get all registrations for an event
    pub async fn list_for_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<Registration>, EventPlannerError> {
        let registrations = sqlx::query_as::<_, Registration>(
            "SELECT id, user_id, event_id, status, payment_status, payment_amount, special_requirements, registration_date, check_in_time, check_out_time, created_at, updated_at FROM registrations WHERE event_id = $1 ORDER BY registration_date ASC"
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Count active registrations for an event
    pub async fn count_active_for_event(&self, event_id: i64) -> Result<i64, EventPlannerError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status IN ('pending', 'confirmed')"
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Remove every registration for an event. Invoked when the event itself
    /// is deleted, so no counter recompute is needed.
    pub async fn delete_all_for_event(&self, event_id: i64) -> Result<u64, EventPlannerError> {
        let result = sqlx::query("DELETE FROM registrations WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Count registrations that occupy a capacity slot
async fn count_active(
    tx: &mut Transaction<'_, Postgres>,
    event_id: i64,
) -> Result<i64, EventPlannerError> {
    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status IN ('pending', 'confirmed')"
    )
    .bind(event_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(count.0)
}

/// Recompute `events.current_participants` from the ledger.
///
/// Always an authoritative aggregation, never an in-place increment, so the
/// counter self-heals from any drift. Returns the fresh count, or 0 when the
/// event no longer exists.
pub(crate) async fn recompute_participants(
    tx: &mut Transaction<'_, Postgres>,
    event_id: i64,
) -> Result<i64, EventPlannerError> {
    let row: Option<(i32,)> = sqlx::query_as(
        r#"
        UPDATE events
        SET current_participants = (
                SELECT COUNT(*) FROM registrations
                WHERE event_id = $1 AND status IN ('pending', 'confirmed')
            ),
            updated_at = $2
        WHERE id = $1
        RETURNING current_participants
        "#,
    )
    .bind(event_id)
    .bind(Utc::now())
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(|(count,)| count as i64).unwrap_or(0))
}
