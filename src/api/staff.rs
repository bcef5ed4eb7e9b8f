//! Staff page endpoints
//!
//! GET    /api/v1/staff      - List staff (public, display order)
//! GET    /api/v1/staff/:id  - Get one profile (public)
//! POST   /api/v1/staff      - Create (admin)
//! PUT    /api/v1/staff/:id  - Update (admin)
//! DELETE /api/v1/staff/:id  - Delete (admin)

use axum::{extract::Path, http::StatusCode, routing::get, Extension, Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use garage_core::store::{Database, StaffMember};

use super::auth::handlers::audit;
use crate::api::response::{ApiError, ApiResponse};
use crate::middleware::auth::RequireAdmin;

/// Create/update request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct StaffUpsertRequest {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub bio: Option<String>,
    /// Display order on the staff page, ascending
    #[serde(default)]
    pub position: i64,
}

impl StaffUpsertRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("staff name must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(ApiError::validation("staff title must not be empty"));
        }
        Ok(())
    }
}

/// List staff in display order
#[utoipa::path(
    get,
    path = "/api/v1/staff",
    tag = "staff",
    responses((status = 200, description = "Staff list"))
)]
pub async fn list_staff(
    Extension(db): Extension<Database>,
) -> Result<Json<ApiResponse<Vec<StaffMember>>>, ApiError> {
    let staff = db.list_staff().await?;
    Ok(Json(ApiResponse::success(staff)))
}

/// Get a single staff profile
#[utoipa::path(
    get,
    path = "/api/v1/staff/{id}",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff profile"),
        (status = 404, description = "Unknown staff member")
    )
)]
pub async fn get_staff(
    Extension(db): Extension<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StaffMember>>, ApiError> {
    let member = db.get_staff(id).await?;
    Ok(Json(ApiResponse::success(member)))
}

/// Create a staff profile (admin)
#[utoipa::path(
    post,
    path = "/api/v1/staff",
    tag = "staff",
    request_body = StaffUpsertRequest,
    responses(
        (status = 201, description = "Created"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer" = []))
)]
pub async fn create_staff(
    RequireAdmin(admin): RequireAdmin,
    Extension(db): Extension<Database>,
    Json(req): Json<StaffUpsertRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StaffMember>>), ApiError> {
    req.validate()?;

    let mut member = StaffMember::new(req.name.trim(), req.title.trim());
    member.bio = req.bio;
    member.position = req.position;

    db.create_staff(&member).await?;
    audit(
        &db,
        Some(admin.id),
        "staff.create",
        &format!("staff:{}", member.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(member))))
}

/// Update a staff profile (admin)
#[utoipa::path(
    put,
    path = "/api/v1/staff/{id}",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    request_body = StaffUpsertRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Unknown staff member")
    ),
    security(("bearer" = []))
)]
pub async fn update_staff(
    RequireAdmin(admin): RequireAdmin,
    Extension(db): Extension<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<StaffUpsertRequest>,
) -> Result<Json<ApiResponse<StaffMember>>, ApiError> {
    req.validate()?;

    let mut member = db.get_staff(id).await?;
    member.name = req.name.trim().to_string();
    member.title = req.title.trim().to_string();
    member.bio = req.bio;
    member.position = req.position;

    db.update_staff(&member).await?;
    audit(&db, Some(admin.id), "staff.update", &format!("staff:{}", id)).await;

    Ok(Json(ApiResponse::success(member)))
}

/// Delete a staff profile (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/staff/{id}",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown staff member")
    ),
    security(("bearer" = []))
)]
pub async fn delete_staff(
    RequireAdmin(admin): RequireAdmin,
    Extension(db): Extension<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    db.delete_staff(id).await?;
    audit(&db, Some(admin.id), "staff.delete", &format!("staff:{}", id)).await;

    Ok(StatusCode::NO_CONTENT)
}

/// Create staff routes
pub fn staff_routes() -> Router {
    Router::new()
        .route("/api/v1/staff", get(list_staff).post(create_staff))
        .route(
            "/api/v1/staff/:id",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_fields() {
        let req = StaffUpsertRequest {
            name: " ".to_string(),
            title: "Mechanic".to_string(),
            bio: None,
            position: 0,
        };
        assert!(req.validate().is_err());

        let req = StaffUpsertRequest {
            name: "Ann".to_string(),
            title: "".to_string(),
            bio: None,
            position: 0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_position_defaults_to_zero() {
        let json = r#"{"name": "Ann", "title": "Mechanic"}"#;
        let req: StaffUpsertRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.position, 0);
        assert!(req.validate().is_ok());
    }
}
