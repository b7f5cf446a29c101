//! Authentication service implementation
//!
//! This service handles account registration, credential verification and
//! JWT bearer-token issuance and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::database::repositories::UserRepository;
use crate::models::user::{CreateUserRequest, User};
use crate::utils::errors::{EventPlannerError, Result};
use crate::utils::helpers::is_valid_email;

const MIN_PASSWORD_LEN: usize = 6;
const MAX_NAME_LEN: usize = 50;

/// JWT claims carried by bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    /// Expiry as a unix timestamp
    pub exp: i64,
    /// Issued at
    pub iat: i64,
}

/// Authentication service for accounts and tokens
#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    settings: Settings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(user_repository: UserRepository, settings: Settings) -> Self {
        Self {
            user_repository,
            settings,
        }
    }

    /// Register a new account and return the user with a fresh token
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String)> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(EventPlannerError::InvalidInput(format!(
                "Name is required and cannot be longer than {} characters",
                MAX_NAME_LEN
            )));
        }
        if !is_valid_email(email.trim()) {
            return Err(EventPlannerError::InvalidInput(
                "A valid email address is required".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(EventPlannerError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if let Some(existing) = self.user_repository.find_by_email(email).await? {
            warn!(email = %existing.email, "Registration attempt with existing email");
            return Err(EventPlannerError::DuplicateEmail {
                email: existing.email,
            });
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| EventPlannerError::Authentication(format!("Password hashing failed: {}", e)))?;

        let user = self
            .user_repository
            .create(CreateUserRequest {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role: None,
            })
            .await?;

        info!(user_id = user.id, "New user registered");
        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Verify credentials and return the user with a fresh token.
    ///
    /// Unknown email and wrong password produce the same error, so the API
    /// does not leak which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let invalid = || EventPlannerError::Authentication("Invalid email or password".to_string());

        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        let matches = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| EventPlannerError::Authentication(format!("Password check failed: {}", e)))?;
        if !matches {
            warn!(user_id = user.id, "Failed login attempt");
            return Err(invalid());
        }

        debug!(user_id = user.id, "User logged in");
        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Issue a signed bearer token for a user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            exp: (now + Duration::hours(self.settings.auth.token_expiry_hours)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
        )
        .map_err(|e| EventPlannerError::Authentication(format!("Token signing failed: {}", e)))
    }

    /// Verify a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| EventPlannerError::Authentication("Invalid or expired token".to_string()))
    }
}
