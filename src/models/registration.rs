//! Registration model
//!
//! One row links one user to one event; the (user_id, event_id) pair is
//! unique at the storage layer. Cancellation deletes the row outright.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub status: String,
    pub payment_status: String,
    /// Mirrors the event price at registration time
    pub payment_amount: f64,
    pub special_requirements: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Attended,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Cancelled => "cancelled",
            RegistrationStatus::Attended => "attended",
        }
    }

    /// Statuses that count toward capacity and the derived participant counter
    pub fn is_active(&self) -> bool {
        matches!(self, RegistrationStatus::Pending | RegistrationStatus::Confirmed)
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body accepted when joining an event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParticipateRequest {
    pub special_requirements: Option<String>,
}

pub const MAX_SPECIAL_REQUIREMENTS_LEN: usize = 500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses() {
        assert!(RegistrationStatus::Pending.is_active());
        assert!(RegistrationStatus::Confirmed.is_active());
        assert!(!RegistrationStatus::Cancelled.is_active());
        assert!(!RegistrationStatus::Attended.is_active());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(RegistrationStatus::Confirmed.to_string(), "confirmed");
        assert_eq!(RegistrationStatus::Attended.as_str(), "attended");
    }
}
