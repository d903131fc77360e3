//! Borrower route definitions

use axum::{routing::get, Router};

use crate::handlers::{borrower_detail_page, get_borrower, list_borrower_loans};
use crate::state::AppState;

pub fn borrower_routes() -> Router<AppState> {
    Router::new()
        .route("/borrowers/:id", get(borrower_detail_page))
        .route("/api/borrowers/:id", get(get_borrower))
        .route("/api/borrowers/:id/loans", get(list_borrower_loans))
}
