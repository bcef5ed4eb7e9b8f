use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use garage_core::auth::Role;
use garage_core::store::User;

use crate::api::response::ApiError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Registration request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Registration response
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub email: String,
}

/// Login request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: access token plus the authenticated profile. The
/// refresh token travels only in the http-only cookie.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access: String,
    #[schema(value_type = String)]
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserView,
}

/// Refresh response
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access: String,
    #[schema(value_type = String)]
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// User profile as exposed by the API (no password hash)
#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    /// `user` or `admin`
    #[schema(value_type = String)]
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
        }
    }
}

/// Validate a registration request, normalizing the email.
pub fn validate_registration(req: &RegisterRequest) -> Result<String, ApiError> {
    let email = normalize_email(&req.email)?;

    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(email)
}

/// Lowercase and shape-check an email address.
pub fn normalize_email(email: &str) -> Result<String, ApiError> {
    let email = email.trim().to_lowercase();

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.contains('@')
                && !email.contains(' ')
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::validation("invalid email address"));
    }

    Ok(email)
}
