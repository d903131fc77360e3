//! Service banner and health check

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::services::BorrowerDetailService;

pub async fn root() -> &'static str {
    "Loanbook Server"
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check(
    State(service): State<Arc<BorrowerDetailService>>,
) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status, database) = match service.ping_store().await {
        Ok(()) => (StatusCode::OK, "healthy", "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "unhealthy",
                format!("error: {}", e),
            )
        }
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            database,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
