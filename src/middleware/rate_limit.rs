//! Rate limiting middleware
//!
//! This module provides rate limiting functionality to prevent abuse
//! and ensure fair usage of the API, using a sliding window per client IP.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::handlers::AppState;
use crate::utils::errors::EventPlannerError;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window_duration: Duration,
    /// Burst allowance (extra requests allowed in short bursts)
    pub burst_allowance: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window_duration: Duration::from_secs(60),
            burst_allowance: 10,
        }
    }
}

/// Rate limit entry for tracking a client's requests
#[derive(Debug, Clone)]
struct RateLimitEntry {
    requests: Vec<Instant>,
    burst_used: u32,
    last_reset: Instant,
}

impl RateLimitEntry {
    fn new() -> Self {
        Self {
            requests: Vec::new(),
            burst_used: 0,
            last_reset: Instant::now(),
        }
    }

    /// Clean up old requests outside the window
    fn cleanup(&mut self, window_duration: Duration) {
        let cutoff = Instant::now() - window_duration;
        self.requests.retain(|&time| time > cutoff);

        // Reset burst if enough time has passed
        if self.last_reset.elapsed() > window_duration {
            self.burst_used = 0;
            self.last_reset = Instant::now();
        }
    }

    /// Check if a request is allowed
    fn is_allowed(&mut self, config: &RateLimitConfig) -> bool {
        self.cleanup(config.window_duration);

        let current_requests = self.requests.len() as u32;

        // Check if within normal limits
        if current_requests < config.max_requests {
            return true;
        }

        // Check if burst allowance is available
        if self.burst_used < config.burst_allowance {
            self.burst_used += 1;
            return true;
        }

        false
    }

    fn record(&mut self) {
        self.requests.push(Instant::now());
    }
}

/// Sliding-window rate limiter keyed by client IP
#[derive(Debug, Clone)]
pub struct RateLimiter {
    entries: Arc<Mutex<HashMap<IpAddr, RateLimitEntry>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    /// Record a request for the client; returns whether it is allowed
    pub fn check(&self, client: IpAddr) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries.entry(client).or_insert_with(RateLimitEntry::new);

        if entry.is_allowed(&self.config) {
            entry.record();
            true
        } else {
            false
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

/// Axum middleware enforcing the per-IP rate limit
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.settings.features.rate_limiting {
        return next.run(request).await;
    }

    let client = client_ip(request.headers());
    if state.rate_limiter.check(client) {
        debug!(client = %client, "Rate limit check passed");
        next.run(request).await
    } else {
        warn!(client = %client, "Rate limit exceeded");
        EventPlannerError::RateLimitExceeded.into_response()
    }
}

/// Extract the client IP from proxy headers, falling back to localhost
fn client_ip(headers: &HeaderMap) -> IpAddr {
    // Try X-Forwarded-For (take first IP)
    if let Some(forwarded) = headers.get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }

    // Try X-Real-IP
    if let Some(real_ip) = headers.get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            if let Ok(ip) = ip_str.parse::<IpAddr>() {
                return ip;
            }
        }
    }

    "127.0.0.1".parse().expect("valid fallback IP")
}
