//! Authentication middleware for Axum
//!
//! Extracts Bearer access tokens from requests and validates them against
//! the `TokenService`. Provides the `RequireAuth` and `OptionalAuth`
//! extractors plus the `RequireAdmin` authorization gate.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use garage_core::auth::{Claims, Role, TokenError, TokenService};
use garage_core::store::{Database, StoreError, User};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// JSON error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl AuthErrorResponse {
    fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Auth rejection type
pub struct AuthRejection {
    status: StatusCode,
    body: AuthErrorResponse,
}

impl AuthRejection {
    fn unauthorized(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: AuthErrorResponse::new(error, code),
        }
    }

    fn forbidden(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            body: AuthErrorResponse::new(error, "FORBIDDEN"),
        }
    }

    fn internal(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: AuthErrorResponse::new(error, "INTERNAL_ERROR"),
        }
    }

    #[cfg(test)]
    fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<TokenError> for AuthRejection {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthRejection::unauthorized("Token expired", "TOKEN_EXPIRED"),
            TokenError::InvalidSignature | TokenError::Malformed | TokenError::WrongKind { .. } => {
                AuthRejection::unauthorized("Invalid token", "INVALID_TOKEN")
            }
        }
    }
}

// ============================================================================
// RequireAuth Extractor
// ============================================================================

/// Axum extractor that requires a valid access token.
///
/// Missing Authorization header and failed verification both halt the
/// pipeline with 401; handlers only ever see verified claims.
pub struct RequireAuth(pub Claims);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let tokens = token_service(parts)?;

        let token = extract_bearer(parts).ok_or_else(|| {
            AuthRejection::unauthorized(
                "Authentication required. Provide Authorization: Bearer <access token>.",
                "UNAUTHORIZED",
            )
        })?;

        let claims = tokens.verify_access(&token)?;
        Ok(RequireAuth(claims))
    }
}

// ============================================================================
// OptionalAuth Extractor
// ============================================================================

/// Axum extractor for routes that serve both anonymous and authenticated
/// callers.
///
/// An absent Authorization header yields `None`; a header that is present
/// but fails verification is still a 401. Bad credentials are never
/// silently downgraded to anonymous.
pub struct OptionalAuth(pub Option<Claims>);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Some(token) = extract_bearer(parts) else {
            return Ok(OptionalAuth(None));
        };

        let tokens = token_service(parts)?;
        let claims = tokens.verify_access(&token)?;
        Ok(OptionalAuth(Some(claims)))
    }
}

// ============================================================================
// RequireAdmin Gate
// ============================================================================

/// Axum extractor gating admin-only routes.
///
/// Verifies the access token, then re-reads the subject's user row: the
/// role decision is made against the database, not the (possibly stale)
/// role claim. A missing or deactivated subject is 401 (the identity is
/// no longer valid) while an active non-admin is 403.
pub struct RequireAdmin(pub User);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let RequireAuth(claims) = RequireAuth::from_request_parts(parts, state).await?;

        let db = parts
            .extensions
            .get::<Database>()
            .ok_or_else(|| AuthRejection::internal("Database not configured"))?;

        let user = match db.get_user(claims.sub).await {
            Ok(user) => user,
            Err(StoreError::UserNotFound(_)) => {
                warn!(user_id = %claims.sub, "Token subject no longer exists");
                return Err(AuthRejection::unauthorized(
                    "Account no longer valid",
                    "UNAUTHORIZED",
                ));
            }
            Err(e) => return Err(AuthRejection::internal(e.to_string())),
        };

        if !user.active {
            warn!(user_id = %user.id, "Deactivated account attempted admin access");
            return Err(AuthRejection::unauthorized(
                "Account no longer valid",
                "UNAUTHORIZED",
            ));
        }

        if !user.role.satisfies(Role::Admin) {
            return Err(AuthRejection::forbidden("Admin role required"));
        }

        Ok(RequireAdmin(user))
    }
}

/// Check whether verified claims belong to a currently active admin.
///
/// Used by public listings that show extra rows to admins; unlike
/// `RequireAdmin` a negative answer is not an error.
pub async fn is_active_admin(db: &Database, claims: &Claims) -> bool {
    if !claims.role.satisfies(Role::Admin) {
        return false;
    }
    match db.get_user(claims.sub).await {
        Ok(user) => user.active && user.role.satisfies(Role::Admin),
        Err(_) => false,
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn token_service(parts: &Parts) -> std::result::Result<Arc<TokenService>, AuthRejection> {
    parts
        .extensions
        .get::<Arc<TokenService>>()
        .cloned()
        .ok_or_else(|| AuthRejection::internal("TokenService not configured"))
}

/// Extract the bearer token from the Authorization header
fn extract_bearer(parts: &Parts) -> Option<String> {
    let value = parts.headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/services");
        if let Some(v) = value {
            builder = builder.header("authorization", v);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_extract_bearer() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        let parts = parts_with_auth(None);
        assert!(extract_bearer(&parts).is_none());
    }

    #[test]
    fn test_extract_bearer_wrong_scheme() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert!(extract_bearer(&parts).is_none());
    }

    #[test]
    fn test_extract_bearer_empty_token() {
        let parts = parts_with_auth(Some("Bearer    "));
        assert!(extract_bearer(&parts).is_none());
    }

    #[test]
    fn test_expired_token_is_401() {
        let rejection = AuthRejection::from(TokenError::Expired);
        assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_is_403() {
        let rejection = AuthRejection::forbidden("Admin role required");
        assert_eq!(rejection.status(), StatusCode::FORBIDDEN);
    }
}
