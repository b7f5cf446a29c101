//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^\w+([\.-]?\w+)*@\w+([\.-]?\w+)*(\.\w{2,3})+$").unwrap()
    })
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Case-fold a location name for use as a cache key component
pub fn normalize_location(location: &str) -> String {
    location.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("marko.petrov@mail.co.uk"));
        assert!(is_valid_email("user-1@sub.domain.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn test_normalize_location() {
        assert_eq!(normalize_location("Skopje"), "skopje");
        assert_eq!(normalize_location("  NEW York  "), "new york");
    }
}
