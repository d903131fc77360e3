//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::services::BorrowerDetailService;
use crate::views::DisplayOptions;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub detail_service: Arc<BorrowerDetailService>,
    pub display: Arc<DisplayOptions>,
}

impl AppState {
    pub fn new(detail_service: Arc<BorrowerDetailService>, display: DisplayOptions) -> Self {
        Self {
            detail_service,
            display: Arc::new(display),
        }
    }
}

impl FromRef<AppState> for Arc<BorrowerDetailService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.detail_service.clone()
    }
}

impl FromRef<AppState> for Arc<DisplayOptions> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.display.clone()
    }
}
