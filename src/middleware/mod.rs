//! Middleware for the Loanbook server
//!
//! Request tracing and security headers.

mod security;
mod tracing;

pub use self::security::{hsts_header, security_headers};
pub use self::tracing::request_tracing;
