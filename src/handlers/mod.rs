//! HTTP handlers for the Loanbook server

pub mod borrowers;
pub mod health;
pub mod pages;

pub use borrowers::{get_borrower, list_borrower_loans};
pub use health::{health_check, root};
pub use pages::borrower_detail_page;
