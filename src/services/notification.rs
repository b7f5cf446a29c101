//! Notification service implementation
//!
//! This service builds and sends transactional emails over SMTP. Delivery is
//! best-effort: every failure is logged and absorbed, since mail is a side
//! effect and never part of a request's contract.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::models::event::Event;
use crate::models::user::User;
use crate::utils::errors::{EventPlannerError, Result};
use crate::utils::helpers::format_timestamp;

/// Notification service for transactional email
#[derive(Clone)]
pub struct NotificationService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    settings: Settings,
}

impl NotificationService {
    /// Create a new NotificationService instance.
    ///
    /// Without an email config section, or with notifications disabled, the
    /// service is constructed in a no-op state.
    pub fn new(settings: Settings) -> Result<Self> {
        let transport = match (&settings.email, settings.features.email_notifications) {
            (Some(email), true) => {
                let transport =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&email.smtp_host)
                        .map_err(|e| {
                            EventPlannerError::Config(format!("Invalid SMTP configuration: {}", e))
                        })?
                        .port(email.smtp_port)
                        .credentials(Credentials::new(
                            email.username.clone(),
                            email.password.clone(),
                        ))
                        .build();
                Some(transport)
            }
            _ => {
                debug!("Email notifications disabled, mail sending is a no-op");
                None
            }
        };

        Ok(Self {
            transport,
            settings,
        })
    }

    /// Whether a transport is configured
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a registration confirmation for an event. Failures are logged,
    /// never returned.
    pub async fn send_registration_confirmation(&self, user: &User, event: &Event) {
        let subject = format!("Registration confirmed: {}", event.title);
        let body = registration_email_body(user, event);

        if let Err(e) = self.send(&user.email, &subject, body).await {
            warn!(user_id = user.id, event_id = event.id, error = %e, "Failed to send registration confirmation");
        }
    }

    /// Notify every registered participant that an event changed. Sends run
    /// concurrently; each failure is logged on its own.
    pub async fn send_event_update(&self, users: &[User], event: &Event) {
        if users.is_empty() {
            return;
        }

        let subject = format!("Event updated: {}", event.title);
        let sends = users.iter().map(|user| {
            let body = event_update_email_body(user, event);
            let subject = subject.clone();
            async move {
                if let Err(e) = self.send(&user.email, &subject, body).await {
                    warn!(user_id = user.id, event_id = event.id, error = %e, "Failed to send event update");
                }
            }
        });
        futures::future::join_all(sends).await;

        info!(event_id = event.id, recipients = users.len(), "Event update notifications sent");
    }

    /// Send a welcome email after signup. Failures are logged, never returned.
    pub async fn send_welcome(&self, user: &User) {
        let subject = "Welcome to EventPlanner!".to_string();
        let body = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h2>Welcome, {name}!</h2>\
             <p>Your EventPlanner account is ready. Browse upcoming events and join the ones you like.</p>\
             <hr style=\"border: none; border-top: 1px solid #eee;\">\
             <p style=\"color: #999; font-size: 12px;\">This message was generated automatically, please do not reply.</p>\
             </div>",
            name = user.name
        );

        if let Err(e) = self.send(&user.email, &subject, body).await {
            warn!(user_id = user.id, error = %e, "Failed to send welcome email");
        }
    }

    async fn send(&self, to: &str, subject: &str, html_body: String) -> Result<()> {
        let Some(transport) = &self.transport else {
            debug!(to = to, subject = subject, "Mail transport disabled, skipping send");
            return Ok(());
        };
        let email_config = self
            .settings
            .email
            .as_ref()
            .ok_or_else(|| EventPlannerError::Config("Email configuration missing".to_string()))?;

        let message = Message::builder()
            .from(
                format!("\"EventPlanner\" <{}>", email_config.from_address)
                    .parse()
                    .map_err(|e| {
                        EventPlannerError::Config(format!("Invalid from address: {}", e))
                    })?,
            )
            .to(to
                .parse()
                .map_err(|e| EventPlannerError::InvalidInput(format!("Invalid recipient: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| EventPlannerError::Config(format!("Failed to build email: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| EventPlannerError::ServiceUnavailable(format!("SMTP send failed: {}", e)))?;

        info!(to = to, subject = subject, "Email sent");
        Ok(())
    }
}

/// HTML body for the event update mail
fn event_update_email_body(user: &User, event: &Event) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2 style=\"color: #2196F3;\">Event updated</h2>\
         <p>Dear {name},</p>\
         <p>The event <strong>{title}</strong> you are registered for has been updated.</p>\
         <div style=\"background-color: #f9f9f9; padding: 15px; border-left: 4px solid #2196F3; margin: 20px 0;\">\
         <h3>Current details:</h3>\
         <p><strong>Location:</strong> {location}</p>\
         <p><strong>Date:</strong> {date}</p>\
         </div>\
         <hr style=\"border: none; border-top: 1px solid #eee; margin: 20px 0;\">\
         <p style=\"color: #999; font-size: 12px;\">This message was generated automatically, please do not reply.</p>\
         </div>",
        name = user.name,
        title = event.title,
        location = event.location,
        date = format_timestamp(event.event_date),
    )
}

/// HTML body for the registration confirmation mail
fn registration_email_body(user: &User, event: &Event) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2 style=\"color: #4CAF50;\">Registration confirmed</h2>\
         <p>Dear {name},</p>\
         <p>Your registration for <strong>{title}</strong> was successful!</p>\
         <div style=\"background-color: #f9f9f9; padding: 15px; border-left: 4px solid #4CAF50; margin: 20px 0;\">\
         <h3>Event details:</h3>\
         <p><strong>Location:</strong> {location}</p>\
         <p><strong>Date:</strong> {date}</p>\
         </div>\
         <p>We look forward to seeing you there!</p>\
         <hr style=\"border: none; border-top: 1px solid #eee; margin: 20px 0;\">\
         <p style=\"color: #999; font-size: 12px;\">This message was generated automatically, please do not reply.</p>\
         </div>",
        name = user.name,
        title = event.title,
        location = event.location,
        date = format_timestamp(event.event_date),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_disabled_without_email_config() {
        let settings = Settings::default();
        let service = NotificationService::new(settings).unwrap();
        assert!(!service.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_send_is_a_noop() {
        let service = NotificationService::new(Settings::default()).unwrap();
        let user = User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            role: "user".to_string(),
            avatar: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        // Must not error or attempt any network I/O
        service.send_welcome(&user).await;
    }

    #[test]
    fn test_registration_email_mentions_event() {
        let user = User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            role: "user".to_string(),
            avatar: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let event = Event {
            id: 2,
            title: "Rust Meetup".to_string(),
            description: "Monthly meetup".to_string(),
            category: "social".to_string(),
            location: "Skopje".to_string(),
            event_date: Utc::now(),
            end_date: Utc::now(),
            max_participants: Some(30),
            current_participants: 0,
            price: 0.0,
            organizer_id: 1,
            image: String::new(),
            is_outside: false,
            status: "published".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let body = registration_email_body(&user, &event);
        assert!(body.contains("Rust Meetup"));
        assert!(body.contains("Skopje"));
        assert!(body.contains("Ana"));

        let update_body = event_update_email_body(&user, &event);
        assert!(update_body.contains("Rust Meetup"));
        assert!(update_body.contains("updated"));
    }
}
