//! Data models for the Loanbook server

use serde::{Deserialize, Serialize};

pub mod borrower;
pub mod loan;

pub use borrower::{Borrower, BorrowerResponse};
pub use loan::{Loan, LoanResponse, LoanStatus, StatusHue};

/// Standard API response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}
