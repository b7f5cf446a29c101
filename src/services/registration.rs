//! Registration service implementation
//!
//! This service orchestrates the registration ledger: it validates input,
//! delegates the transactional work to the repository and fires best-effort
//! confirmation emails after a successful join.

use tracing::{debug, info};

use crate::database::repositories::{EventRepository, RegistrationRepository, UserRepository};
use crate::models::registration::{
    ParticipateRequest, Registration, MAX_SPECIAL_REQUIREMENTS_LEN,
};
use crate::services::notification::NotificationService;
use crate::utils::errors::{EventPlannerError, Result};

/// Registration service mediating join/cancel requests
#[derive(Clone)]
pub struct RegistrationService {
    registrations: RegistrationRepository,
    events: EventRepository,
    users: UserRepository,
    notifications: NotificationService,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    pub fn new(
        registrations: RegistrationRepository,
        events: EventRepository,
        users: UserRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            registrations,
            events,
            users,
            notifications,
        }
    }

    /// Join an event.
    ///
    /// Capacity and uniqueness are enforced inside the ledger transaction;
    /// the confirmation email is fire-and-forget and never affects the
    /// outcome.
    pub async fn participate(
        &self,
        user_id: i64,
        event_id: i64,
        request: ParticipateRequest,
    ) -> Result<Registration> {
        if let Some(ref requirements) = request.special_requirements {
            if requirements.chars().count() > MAX_SPECIAL_REQUIREMENTS_LEN {
                return Err(EventPlannerError::InvalidInput(format!(
                    "Special requirements cannot be longer than {} characters",
                    MAX_SPECIAL_REQUIREMENTS_LEN
                )));
            }
        }

        let registration = self
            .registrations
            .participate(user_id, event_id, request.special_requirements)
            .await?;

        info!(
            registration_id = registration.id,
            user_id = user_id,
            event_id = event_id,
            "User registered for event"
        );

        self.send_confirmation(user_id, event_id).await;

        Ok(registration)
    }

    /// Cancel the caller's registration. A repeated cancel reports
    /// `RegistrationNotFound`, which callers surface as "already cancelled".
    pub async fn cancel(&self, user_id: i64, event_id: i64) -> Result<()> {
        self.registrations.cancel(user_id, event_id).await
    }

    /// The caller's registration for an event, or `None`. Never an error for
    /// the "not registered" case; the client uses this to toggle its UI.
    pub async fn my_status(&self, user_id: i64, event_id: i64) -> Result<Option<Registration>> {
        self.registrations
            .find_by_user_and_event(user_id, event_id)
            .await
    }

    /// Spawn a best-effort confirmation email for a successful registration
    async fn send_confirmation(&self, user_id: i64, event_id: i64) {
        if !self.notifications.is_enabled() {
            return;
        }

        let user = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            _ => return,
        };
        let event = match self.events.find_by_id(event_id).await {
            Ok(Some(event)) => event,
            _ => return,
        };

        let notifications = self.notifications.clone();
        tokio::spawn(async move {
            notifications.send_registration_confirmation(&user, &event).await;
        });
        debug!(user_id = user_id, event_id = event_id, "Confirmation email queued");
    }
}
