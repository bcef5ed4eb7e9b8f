//! Web API module for the garage server
//!
//! Provides REST API endpoints for:
//! - Authentication (register, login, refresh, logout)
//! - Service catalog
//! - Staff profiles
//! - Favorites
//! - User administration and the audit log

pub mod audit;
pub mod auth;
pub mod docs;
pub mod favorites;
pub mod health;
pub mod response;
pub mod services;
pub mod staff;
pub mod users;

use axum::Router;

pub use audit::audit_routes;
pub use auth::auth_routes;
pub use docs::docs_routes;
pub use favorites::favorites_routes;
pub use health::health_routes;
pub use services::services_routes;
pub use staff::staff_routes;
pub use users::users_routes;

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(services_routes())
        .merge(staff_routes())
        .merge(favorites_routes())
        .merge(users_routes())
        .merge(audit_routes())
}
