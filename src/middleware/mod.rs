//! Middleware module
//!
//! Authentication extractors and request-level middleware for the HTTP API

pub mod auth;
pub mod logging;
pub mod rate_limit;

pub use auth::AuthUser;
pub use logging::request_logging;
pub use rate_limit::{rate_limit_middleware, RateLimitConfig, RateLimiter};
