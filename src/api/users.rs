//! User administration endpoints (admin only)
//!
//! GET /api/v1/users             - List accounts
//! PUT /api/v1/users/:id/role    - Change an account's role
//! PUT /api/v1/users/:id/active  - Deactivate/reactivate an account
//!
//! Accounts are never hard-deleted; deactivation is the only removal.

use axum::{extract::Path, routing::get, routing::put, Extension, Json, Router};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use garage_core::auth::Role;
use garage_core::store::Database;

use super::auth::handlers::audit;
use super::auth::UserView;
use crate::api::response::{ApiError, ApiResponse};
use crate::middleware::auth::RequireAdmin;

/// Role change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleChangeRequest {
    /// `user` or `admin`
    #[schema(value_type = String)]
    pub role: Role,
}

/// Activation change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ActiveChangeRequest {
    pub active: bool,
}

/// List all accounts
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Account list", body = Vec<UserView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer" = []))
)]
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    Extension(db): Extension<Database>,
) -> Result<Json<ApiResponse<Vec<UserView>>>, ApiError> {
    let users = db.list_users().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserView::from).collect(),
    )))
}

/// Change an account's role
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/role",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Role changed", body = UserView),
        (status = 400, description = "Admins cannot change their own role"),
        (status = 404, description = "Unknown user")
    ),
    security(("bearer" = []))
)]
pub async fn change_role(
    RequireAdmin(admin): RequireAdmin,
    Extension(db): Extension<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<RoleChangeRequest>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    // A lone admin demoting themselves would lock everyone out.
    if id == admin.id {
        return Err(ApiError::validation("admins cannot change their own role"));
    }

    db.set_user_role(id, req.role).await?;
    info!(user_id = %id, role = %req.role, actor = %admin.id, "Role changed");
    audit(&db, Some(admin.id), "user.role_change", &format!("user:{}", id)).await;

    let user = db.get_user(id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Deactivate or reactivate an account
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/active",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = ActiveChangeRequest,
    responses(
        (status = 200, description = "Activation changed", body = UserView),
        (status = 400, description = "Admins cannot deactivate themselves"),
        (status = 404, description = "Unknown user")
    ),
    security(("bearer" = []))
)]
pub async fn change_active(
    RequireAdmin(admin): RequireAdmin,
    Extension(db): Extension<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActiveChangeRequest>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    if id == admin.id && !req.active {
        return Err(ApiError::validation("admins cannot deactivate themselves"));
    }

    db.set_user_active(id, req.active).await?;
    let action = if req.active {
        "user.activate"
    } else {
        "user.deactivate"
    };
    info!(user_id = %id, active = req.active, actor = %admin.id, "Activation changed");
    audit(&db, Some(admin.id), action, &format!("user:{}", id)).await;

    let user = db.get_user(id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// Create user administration routes
pub fn users_routes() -> Router {
    Router::new()
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/:id/role", put(change_role))
        .route("/api/v1/users/:id/active", put(change_active))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_change_deserialization() {
        let req: RoleChangeRequest = serde_json::from_str(r#"{"role": "admin"}"#).unwrap();
        assert_eq!(req.role, Role::Admin);

        let bad: Result<RoleChangeRequest, _> = serde_json::from_str(r#"{"role": "root"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_active_change_deserialization() {
        let req: ActiveChangeRequest = serde_json::from_str(r#"{"active": false}"#).unwrap();
        assert!(!req.active);
    }
}
