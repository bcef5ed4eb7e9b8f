//! Middleware module for the garage HTTP server
//!
//! Provides:
//! - Authentication extractors (Bearer access tokens)
//! - The admin authorization gate
//! - Rate limiting middleware

pub mod auth;
pub mod rate_limit;
