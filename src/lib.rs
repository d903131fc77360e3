//! Loanbook Server Library
//!
//! Borrower detail pages and the read-only borrower/loan API of the Loanbook
//! lending back office.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod query_cache;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;
