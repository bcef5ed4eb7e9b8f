//! Response envelope and API error taxonomy
//!
//! Every JSON endpoint returns `ApiResponse<T>`; failures map onto a
//! fixed set of status codes. Internal errors are logged with their cause
//! and returned as an opaque 500 body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use garage_core::store::StoreError;

/// Standard response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<T> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// API failure taxonomy
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request shape is wrong (400)
    #[error("{0}")]
    Validation(String),

    /// Missing/invalid credentials or stale identity (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but insufficient privilege (403)
    #[error("{0}")]
    Forbidden(String),

    /// No such entity (404)
    #[error("{0}")]
    NotFound(String),

    /// State conflict, e.g. duplicate email (409)
    #[error("{0}")]
    Conflict(String),

    /// Too many requests (429); headers are added by the rate limiter
    #[error("rate limit exceeded")]
    RateLimited {
        /// Seconds until the window resets
        retry_after: u64,
    },

    /// Anything unexpected (500); cause is logged, not returned
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(cause) => {
                error!(cause = %cause, "Internal error");
                "internal error".to_string()
            }
            ApiError::RateLimited { .. } => "Rate limit exceeded. Please retry later.".to_string(),
            other => other.to_string(),
        };

        (self.status(), Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => {
                ApiError::Conflict(format!("email already registered: {}", email))
            }
            StoreError::UserNotFound(id) => ApiError::NotFound(format!("user not found: {}", id)),
            StoreError::ServiceNotFound(id) => {
                ApiError::NotFound(format!("service not found: {}", id))
            }
            StoreError::StaffNotFound(id) => {
                ApiError::NotFound(format!("staff member not found: {}", id))
            }
            StoreError::Database(e) => ApiError::Internal(e.to_string()),
            StoreError::InvalidRow(e) | StoreError::Setup(e) => ApiError::Internal(e),
        }
    }
}

impl From<garage_core::Error> for ApiError {
    fn from(err: garage_core::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::validation("bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("no").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::RateLimited { retry_after: 1 }.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_internal_error_is_opaque() {
        let response = ApiError::Internal("password column missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body must not carry the cause; it is only logged.
    }

    #[test]
    fn test_duplicate_email_maps_to_conflict() {
        let err: ApiError = StoreError::DuplicateEmail("a@b.test".into()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 42);
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(err["success"], false);
        assert_eq!(err["error"], "nope");
    }
}
