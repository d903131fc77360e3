//! Server-rendered pages

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    response::Html,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::is_truthy;
use crate::state::AppState;
use crate::views::invalid_id_page;

#[derive(Debug, Default, Deserialize)]
pub struct DetailPageParams {
    /// Drop cached results for this borrower before loading
    pub refresh: Option<String>,
}

impl DetailPageParams {
    pub fn wants_refresh(&self) -> bool {
        self.refresh.as_deref().is_some_and(is_truthy)
    }
}

/// Borrower detail page
pub async fn borrower_detail_page(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    Query(params): Query<DetailPageParams>,
) -> (StatusCode, Html<String>) {
    let id = match path {
        Ok(Path(id)) => id,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected borrower detail path");
            let page = invalid_id_page();
            return (page.status, Html(page.html));
        }
    };

    if params.wants_refresh() {
        state.detail_service.invalidate(id).await;
    }

    let view = state.detail_service.load_view(id).await;
    let page = view.render(&state.display);

    tracing::debug!(
        borrower_id = %id,
        status = %page.status.as_u16(),
        "Rendered borrower detail page"
    );

    (page.status, Html(page.html))
}
