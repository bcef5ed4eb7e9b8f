//! API Documentation - Swagger UI
//!
//! Provides OpenAPI documentation at /docs

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::{
    auth::{
        LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, RegisterResponse, UserView,
    },
    services::ServiceUpsertRequest,
    staff::StaffUpsertRequest,
    users::{ActiveChangeRequest, RoleChangeRequest},
};

/// Garage API OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bob's Garage API",
        version = "1.0.0",
        description = "REST backend for the Bob's Garage website.

## Overview
- **Auth**: registration, login, token refresh, logout
- **Services**: the garage's service catalog
- **Staff**: staff page profiles
- **Favorites**: per-user service bookmarks
- **Users**: account administration (admin)
- **Audit**: audit log (admin)

## Authentication
Protected endpoints expect an access token:
```
Authorization: Bearer <access token>
```
The refresh token is carried in an http-only cookie scoped to the auth
endpoints.
",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Auth
        crate::api::auth::handlers::register,
        crate::api::auth::handlers::login,
        crate::api::auth::handlers::refresh,
        crate::api::auth::handlers::logout,
        crate::api::auth::handlers::me,
        // Services
        crate::api::services::list_services,
        crate::api::services::get_service,
        crate::api::services::create_service,
        crate::api::services::update_service,
        crate::api::services::delete_service,
        // Staff
        crate::api::staff::list_staff,
        crate::api::staff::get_staff,
        crate::api::staff::create_staff,
        crate::api::staff::update_staff,
        crate::api::staff::delete_staff,
        // Favorites
        crate::api::favorites::list_favorites,
        crate::api::favorites::add_favorite,
        crate::api::favorites::remove_favorite,
        // Users
        crate::api::users::list_users,
        crate::api::users::change_role,
        crate::api::users::change_active,
        // Audit
        crate::api::audit::list_audit,
    ),
    components(
        schemas(
            // Auth
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            RefreshResponse,
            UserView,
            // Services
            ServiceUpsertRequest,
            // Staff
            StaffUpsertRequest,
            // Users
            RoleChangeRequest,
            ActiveChangeRequest,
        )
    ),
    tags(
        (name = "auth", description = "Registration and token lifecycle"),
        (name = "services", description = "Service catalog"),
        (name = "staff", description = "Staff page profiles"),
        (name = "favorites", description = "Per-user service bookmarks"),
        (name = "users", description = "Account administration"),
        (name = "audit", description = "Audit log"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn docs_routes() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/api/v1/auth/login"));
        assert!(json.contains("/api/v1/services"));
        assert!(json.contains("/api/v1/audit"));
    }
}
