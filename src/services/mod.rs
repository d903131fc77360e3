//! Services behind the HTTP handlers

mod borrower_detail;

pub use borrower_detail::BorrowerDetailService;
