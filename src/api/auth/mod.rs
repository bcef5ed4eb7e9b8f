//! Authentication endpoints
//!
//! POST /api/v1/auth/register - Create an account
//! POST /api/v1/auth/login    - Issue access token + refresh cookie
//! POST /api/v1/auth/refresh  - Mint a new access token from the cookie
//! POST /api/v1/auth/logout   - Clear the refresh cookie
//! GET  /api/v1/auth/me       - Current authenticated profile

pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;

use axum::{
    routing::{get, post},
    Router,
};

pub use handlers::REFRESH_COOKIE;
pub use types::{LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, RegisterResponse, UserView};

/// Create auth routes
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/v1/auth/register", post(handlers::register))
        .route("/api/v1/auth/login", post(handlers::login))
        .route("/api/v1/auth/refresh", post(handlers::refresh))
        .route("/api/v1/auth/logout", post(handlers::logout))
        .route("/api/v1/auth/me", get(handlers::me))
}
