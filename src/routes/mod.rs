//! Route definitions and router assembly

mod borrower;

pub use borrower::borrower_routes;

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{health_check, root};
use crate::middleware;
use crate::state::AppState;

/// Full application router with middleware applied
pub fn app_router(state: AppState, cors_allowed_origins: Option<&str>, hsts: bool) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(borrower_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers));

    let router = if hsts {
        router.layer(axum::middleware::from_fn(middleware::hsts_header))
    } else {
        router
    };

    router
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(configure_cors(cors_allowed_origins))
}

fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let allowed_origins = allowed_origins.unwrap_or_default();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
}
