//! Health check endpoint
//!
//! Used by load balancers and monitoring to verify the service is running.
//! This endpoint does not check dependencies.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: &'static str,
}

/// GET /health
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        success: true,
        message: "EventPlanner API is running",
    })
}
