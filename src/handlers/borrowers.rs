//! Borrower JSON API handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{ApiResponse, BorrowerResponse, LoanResponse};
use crate::services::BorrowerDetailService;
use crate::state::AppState;

fn borrower_id(path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Get a borrower by ID
pub async fn get_borrower(
    State(service): State<Arc<BorrowerDetailService>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ApiResponse<BorrowerResponse>>> {
    let id = borrower_id(path)?;

    let borrower = service
        .load_borrower(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Borrower {} not found", id)))?;

    Ok(Json(ApiResponse::ok(borrower.into())))
}

/// Loan history of a borrower, newest first
pub async fn list_borrower_loans(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ApiResponse<Vec<LoanResponse>>>> {
    let id = borrower_id(path)?;

    let loans = state.detail_service.load_loan_history(id).await?;
    let loans = loans
        .into_iter()
        .map(|loan| LoanResponse::new(loan, &state.display))
        .collect();

    Ok(Json(ApiResponse::ok(loans)))
}
