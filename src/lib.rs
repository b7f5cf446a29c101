//! EventPlanner REST API
//!
//! Backend for an event-planning application. This library provides modular
//! components for authentication, event management, capacity-bounded
//! registrations with a derived participant counter, threaded comments and
//! a cached weather lookup for outdoor events.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventPlannerError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::{build_router, AppState};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
