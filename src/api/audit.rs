//! Audit log endpoint (admin only)
//!
//! GET /api/v1/audit?limit=N - Recent audit entries, newest first

use axum::{extract::Query, routing::get, Extension, Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use garage_core::store::{AuditEntry, Database};

use crate::api::response::{ApiError, ApiResponse};
use crate::middleware::auth::RequireAdmin;

/// Query parameters for the audit listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct AuditQuery {
    /// Maximum number of entries
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// List recent audit entries
#[utoipa::path(
    get,
    path = "/api/v1/audit",
    tag = "audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit entries, newest first"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer" = []))
)]
pub async fn list_audit(
    RequireAdmin(_admin): RequireAdmin,
    Extension(db): Extension<Database>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<ApiResponse<Vec<AuditEntry>>>, ApiError> {
    let limit = query.limit.clamp(1, 500);
    let entries = db.list_audit(limit).await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// Create audit routes
pub fn audit_routes() -> Router {
    Router::new().route("/api/v1/audit", get(list_audit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit() {
        let query: AuditQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 50);
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(10_000_i64.clamp(1, 500), 500);
        assert_eq!((-3_i64).clamp(1, 500), 1);
    }
}
