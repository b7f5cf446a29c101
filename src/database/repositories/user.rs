//! User repository implementation

use crate::models::user::{CreateUserRequest, User};
use crate::utils::errors::EventPlannerError;
use chrono::Utc;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, EventPlannerError> {
        let email = request.email.trim().to_lowercase();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, name, email, password_hash, role, avatar, created_at, updated_at
            "#,
        )
        .bind(request.name)
        .bind(&email)
        .bind(request.password_hash)
        .bind(request.role.unwrap_or_else(|| "user".to_string()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                EventPlannerError::DuplicateEmail {
                    email: email.clone(),
                }
            }
            _ => EventPlannerError::Database(e),
        })?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, EventPlannerError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, avatar, created_at, updated_at FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email (case-normalized)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, EventPlannerError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, avatar, created_at, updated_at FROM users WHERE email = $1"
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get users holding an active registration for an event
    pub async fn find_registered_for_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<User>, EventPlannerError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.role, u.avatar, u.created_at, u.updated_at
            FROM users u
            INNER JOIN registrations r ON r.user_id = u.id
            WHERE r.event_id = $1 AND r.status IN ('pending', 'confirmed')
            ORDER BY r.registration_date ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
