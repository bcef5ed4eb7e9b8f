//! Favorites endpoints
//!
//! GET    /api/v1/favorites              - The caller's favorited services
//! PUT    /api/v1/favorites/:service_id  - Add (idempotent)
//! DELETE /api/v1/favorites/:service_id  - Remove (idempotent)
//!
//! All routes require a bearer token and only ever touch the caller's
//! own rows.

use axum::{extract::Path, http::StatusCode, routing::get, Extension, Json, Router};
use uuid::Uuid;

use garage_core::store::{Database, ServiceItem};

use crate::api::response::{ApiError, ApiResponse};
use crate::middleware::auth::RequireAuth;

/// List the caller's favorited services
#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    tag = "favorites",
    responses(
        (status = 200, description = "Favorited services"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = []))
)]
pub async fn list_favorites(
    RequireAuth(claims): RequireAuth,
    Extension(db): Extension<Database>,
) -> Result<Json<ApiResponse<Vec<ServiceItem>>>, ApiError> {
    let services = db.list_favorites(claims.sub).await?;
    Ok(Json(ApiResponse::success(services)))
}

/// Favorite a service (idempotent)
#[utoipa::path(
    put,
    path = "/api/v1/favorites/{service_id}",
    tag = "favorites",
    params(("service_id" = Uuid, Path, description = "Service to favorite")),
    responses(
        (status = 204, description = "Favorited"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown or unpublished service")
    ),
    security(("bearer" = []))
)]
pub async fn add_favorite(
    RequireAuth(claims): RequireAuth,
    Extension(db): Extension<Database>,
    Path(service_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    db.add_favorite(claims.sub, service_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a favorite (idempotent)
#[utoipa::path(
    delete,
    path = "/api/v1/favorites/{service_id}",
    tag = "favorites",
    params(("service_id" = Uuid, Path, description = "Service to unfavorite")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = []))
)]
pub async fn remove_favorite(
    RequireAuth(claims): RequireAuth,
    Extension(db): Extension<Database>,
    Path(service_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    db.remove_favorite(claims.sub, service_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create favorites routes
pub fn favorites_routes() -> Router {
    Router::new()
        .route("/api/v1/favorites", get(list_favorites))
        .route(
            "/api/v1/favorites/:service_id",
            axum::routing::put(add_favorite).delete(remove_favorite),
        )
}
