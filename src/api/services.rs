//! Service catalog endpoints
//!
//! GET    /api/v1/services      - List services (public)
//! GET    /api/v1/services/:id  - Get one service (public)
//! POST   /api/v1/services      - Create (admin)
//! PUT    /api/v1/services/:id  - Update (admin)
//! DELETE /api/v1/services/:id  - Delete (admin)
//!
//! Unpublished entries exist so the garage can stage price changes; they
//! are visible to admins only.

use axum::{extract::Path, http::StatusCode, routing::get, Extension, Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use garage_core::store::{Database, ServiceItem};

use super::auth::handlers::audit;
use crate::api::response::{ApiError, ApiResponse};
use crate::middleware::auth::{is_active_admin, OptionalAuth, RequireAdmin};

/// Create/update request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct ServiceUpsertRequest {
    pub name: String,
    pub description: String,
    /// Price in cents
    pub price_cents: i64,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

impl ServiceUpsertRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("service name must not be empty"));
        }
        if self.price_cents < 0 {
            return Err(ApiError::validation("price must not be negative"));
        }
        Ok(())
    }
}

/// List the catalog (admins also see unpublished entries)
#[utoipa::path(
    get,
    path = "/api/v1/services",
    tag = "services",
    responses((status = 200, description = "Service list"))
)]
pub async fn list_services(
    OptionalAuth(auth): OptionalAuth,
    Extension(db): Extension<Database>,
) -> Result<Json<ApiResponse<Vec<ServiceItem>>>, ApiError> {
    let include_unpublished = match &auth {
        Some(claims) => is_active_admin(&db, claims).await,
        None => false,
    };

    let services = db.list_services(include_unpublished).await?;
    Ok(Json(ApiResponse::success(services)))
}

/// Get a single service
#[utoipa::path(
    get,
    path = "/api/v1/services/{id}",
    tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service"),
        (status = 404, description = "Unknown or unpublished service")
    )
)]
pub async fn get_service(
    OptionalAuth(auth): OptionalAuth,
    Extension(db): Extension<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceItem>>, ApiError> {
    let service = db.get_service(id).await?;

    if !service.published {
        let admin = match &auth {
            Some(claims) => is_active_admin(&db, claims).await,
            None => false,
        };
        if !admin {
            return Err(ApiError::NotFound(format!("service not found: {}", id)));
        }
    }

    Ok(Json(ApiResponse::success(service)))
}

/// Create a service (admin)
#[utoipa::path(
    post,
    path = "/api/v1/services",
    tag = "services",
    request_body = ServiceUpsertRequest,
    responses(
        (status = 201, description = "Created"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer" = []))
)]
pub async fn create_service(
    RequireAdmin(admin): RequireAdmin,
    Extension(db): Extension<Database>,
    Json(req): Json<ServiceUpsertRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceItem>>), ApiError> {
    req.validate()?;

    let mut service = ServiceItem::new(req.name.trim(), req.description, req.price_cents);
    service.published = req.published;

    db.create_service(&service).await?;
    audit(
        &db,
        Some(admin.id),
        "service.create",
        &format!("service:{}", service.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(service))))
}

/// Update a service (admin)
#[utoipa::path(
    put,
    path = "/api/v1/services/{id}",
    tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = ServiceUpsertRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Unknown service")
    ),
    security(("bearer" = []))
)]
pub async fn update_service(
    RequireAdmin(admin): RequireAdmin,
    Extension(db): Extension<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<ServiceUpsertRequest>,
) -> Result<Json<ApiResponse<ServiceItem>>, ApiError> {
    req.validate()?;

    let mut service = db.get_service(id).await?;
    service.name = req.name.trim().to_string();
    service.description = req.description;
    service.price_cents = req.price_cents;
    service.published = req.published;

    db.update_service(&service).await?;
    audit(
        &db,
        Some(admin.id),
        "service.update",
        &format!("service:{}", id),
    )
    .await;

    Ok(Json(ApiResponse::success(service)))
}

/// Delete a service (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/services/{id}",
    tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown service")
    ),
    security(("bearer" = []))
)]
pub async fn delete_service(
    RequireAdmin(admin): RequireAdmin,
    Extension(db): Extension<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    db.delete_service(id).await?;
    audit(
        &db,
        Some(admin.id),
        "service.delete",
        &format!("service:{}", id),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Create service catalog routes
pub fn services_routes() -> Router {
    Router::new()
        .route("/api/v1/services", get(list_services).post(create_service))
        .route(
            "/api/v1/services/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, price_cents: i64) -> ServiceUpsertRequest {
        ServiceUpsertRequest {
            name: name.to_string(),
            description: "desc".to_string(),
            price_cents,
            published: true,
        }
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        assert!(request("  ", 100).validate().is_err());
        assert!(request("Oil change", 100).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        assert!(request("Oil change", -1).validate().is_err());
        assert!(request("Free check", 0).validate().is_ok());
    }

    #[test]
    fn test_published_defaults_to_true() {
        let json = r#"{"name": "MOT", "description": "d", "price_cents": 100}"#;
        let req: ServiceUpsertRequest = serde_json::from_str(json).unwrap();
        assert!(req.published);
    }
}
