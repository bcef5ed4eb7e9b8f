use axum::{http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use tracing::{info, warn};

use garage_core::auth::{hash_password, verify_password, TokenService};
use garage_core::store::{Database, User};

use super::types::{
    validate_registration, LoginRequest, LoginResponse, RefreshResponse, RegisterRequest,
    RegisterResponse, UserView,
};
use crate::api::response::{ApiError, ApiResponse};
use crate::middleware::auth::RequireAuth;
use crate::server::config::AppConfig;

/// Name of the refresh token cookie
pub const REFRESH_COOKIE: &str = "garage_refresh";

/// The refresh cookie is only ever sent back to the auth endpoints
const COOKIE_PATH: &str = "/api/v1/auth";

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    Extension(db): Extension<Database>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    let email = validate_registration(&req)?;

    let hash = hash_password(&req.password)?;
    let mut user = User::new(email, hash);
    if let Some(name) = req.name.filter(|n| !n.trim().is_empty()) {
        user = user.with_name(name.trim());
    }

    db.create_user(&user).await?;
    info!(user_id = %user.id, "Account registered");
    audit(&db, None, "auth.register", &format!("user:{}", user.id)).await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RegisterResponse {
            id: user.id,
            email: user.email,
        })),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 401, description = "Bad credentials")
    )
)]
pub async fn login(
    Extension(db): Extension<Database>,
    Extension(tokens): Extension<Arc<TokenService>>,
    Extension(config): Extension<Arc<AppConfig>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    // Unknown email, wrong password, and deactivated account are
    // indistinguishable to the caller.
    let invalid = || ApiError::unauthorized("invalid credentials");

    let user = db
        .find_user_by_email(&req.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash) {
        warn!(user_id = %user.id, "Failed login attempt");
        return Err(invalid());
    }

    if !user.active {
        warn!(user_id = %user.id, "Login attempt on deactivated account");
        return Err(invalid());
    }

    let access = tokens.sign_access(user.id, &user.email, user.role)?;
    let refresh = tokens.sign_refresh(user.id, &user.email, user.role)?;

    info!(user_id = %user.id, "Login");
    audit(&db, Some(user.id), "auth.login", &format!("user:{}", user.id)).await;

    let jar = jar.add(refresh_cookie(refresh, config.auth.cookie_secure));
    Ok((
        jar,
        Json(ApiResponse::success(LoginResponse {
            access,
            token_type: "Bearer",
            expires_in: tokens.access_ttl_secs(),
            user: user.into(),
        })),
    ))
}

/// Mint a new access token from the refresh cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Missing, invalid, or expired refresh token")
    )
)]
pub async fn refresh(
    Extension(db): Extension<Database>,
    Extension(tokens): Extension<Arc<TokenService>>,
    Extension(config): Extension<Arc<AppConfig>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<RefreshResponse>>), ApiError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("missing refresh token"))?;

    let claims = tokens
        .verify_refresh(&token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    // The subject must still be an active account; tokens outlive
    // deactivation but stop being refreshable.
    let user = match db.get_user(claims.sub).await {
        Ok(user) if user.active => user,
        Ok(_) | Err(garage_core::store::StoreError::UserNotFound(_)) => {
            return Err(ApiError::unauthorized("account no longer valid"));
        }
        Err(e) => return Err(e.into()),
    };

    let access = tokens.sign_access(user.id, &user.email, user.role)?;
    let rotated = tokens.sign_refresh(user.id, &user.email, user.role)?;

    let jar = jar.add(refresh_cookie(rotated, config.auth.cookie_secure));
    Ok((
        jar,
        Json(ApiResponse::success(RefreshResponse {
            access,
            token_type: "Bearer",
            expires_in: tokens.access_ttl_secs(),
        })),
    ))
}

/// Log out: clear the refresh cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses((status = 204, description = "Refresh cookie cleared"))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build((REFRESH_COOKIE, "")).path(COOKIE_PATH));
    (jar, StatusCode::NO_CONTENT)
}

/// Current authenticated profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current profile", body = UserView),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = []))
)]
pub async fn me(
    RequireAuth(claims): RequireAuth,
    Extension(db): Extension<Database>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    let user = match db.get_user(claims.sub).await {
        Ok(user) => user,
        Err(garage_core::store::StoreError::UserNotFound(_)) => {
            return Err(ApiError::unauthorized("account no longer valid"));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ApiResponse::success(user.into())))
}

fn refresh_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path(COOKIE_PATH)
        .secure(secure)
        .build()
}

/// Append to the audit log; audit failures are logged, never surfaced.
pub(crate) async fn audit(db: &Database, actor: Option<uuid::Uuid>, action: &str, entity: &str) {
    if let Err(e) = db.record_audit(actor, action, entity, None).await {
        warn!(action = %action, error = %e, "Audit write failed");
    }
}
