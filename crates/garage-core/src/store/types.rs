//! Domain models, row types, and store errors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::Role;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Email already registered
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
    /// User not found
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    /// Service not found
    #[error("service not found: {0}")]
    ServiceNotFound(Uuid),
    /// Staff member not found
    #[error("staff member not found: {0}")]
    StaffNotFound(Uuid),
    /// A stored row failed to convert back into its model
    #[error("invalid row: {0}")]
    InvalidRow(String),
    /// Storage location could not be prepared
    #[error("storage setup failed: {0}")]
    Setup(String),
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,
    /// Unique login email
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// bcrypt hash; never serialized into API responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Authorization role
    pub role: Role,
    /// Deactivated accounts cannot log in or pass the admin gate
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new regular user
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: None,
            password_hash: password_hash.into(),
            role: Role::User,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the role
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// An entry in the garage's service catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceItem {
    /// Unique service ID
    pub id: Uuid,
    /// Display name ("Oil change", "MOT test")
    pub name: String,
    /// Customer-facing description
    pub description: String,
    /// Price in cents
    pub price_cents: i64,
    /// Unpublished entries are only visible to admins
    pub published: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ServiceItem {
    /// Create a new published service
    pub fn new(name: impl Into<String>, description: impl Into<String>, price_cents: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            price_cents,
            published: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A staff profile shown on the site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique staff ID
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Job title ("Head mechanic")
    pub title: String,
    /// Short bio
    pub bio: Option<String>,
    /// Display order on the staff page, ascending
    pub position: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl StaffMember {
    /// Create a new staff member at the end of the display order
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            title: title.into(),
            bio: None,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One line of the append-only audit log
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// Unique entry ID
    pub id: Uuid,
    /// Acting user, if the event had an authenticated actor
    pub actor_id: Option<Uuid>,
    /// Action name ("auth.login", "service.delete")
    pub action: String,
    /// Affected entity ("user:<id>", "service:<id>")
    pub entity: String,
    /// Free-form detail
    pub detail: Option<String>,
    /// When the event happened
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Row types
// ============================================================================

/// Internal row type for user queries
#[derive(FromRow)]
pub(super) struct UserRow {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: parse_id(&row.id)?,
            role: Role::parse(&row.role)
                .ok_or_else(|| StoreError::InvalidRow(format!("unknown role '{}'", row.role)))?,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for service queries
#[derive(FromRow)]
pub(super) struct ServiceRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ServiceRow> for ServiceItem {
    type Error = StoreError;

    fn try_from(row: ServiceRow) -> Result<Self> {
        Ok(ServiceItem {
            id: parse_id(&row.id)?,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            published: row.published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for staff queries
#[derive(FromRow)]
pub(super) struct StaffRow {
    pub id: String,
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<StaffRow> for StaffMember {
    type Error = StoreError;

    fn try_from(row: StaffRow) -> Result<Self> {
        Ok(StaffMember {
            id: parse_id(&row.id)?,
            name: row.name,
            title: row.title,
            bio: row.bio,
            position: row.position,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for audit queries
#[derive(FromRow)]
pub(super) struct AuditRow {
    pub id: String,
    pub actor_id: Option<String>,
    pub action: String,
    pub entity: String,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AuditRow> for AuditEntry {
    type Error = StoreError;

    fn try_from(row: AuditRow) -> Result<Self> {
        Ok(AuditEntry {
            id: parse_id(&row.id)?,
            actor_id: row.actor_id.as_deref().map(parse_id).transpose()?,
            action: row.action,
            entity: row.entity,
            detail: row.detail,
            created_at: row.created_at,
        })
    }
}

fn parse_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| StoreError::InvalidRow(format!("invalid id '{}': {}", s, e)))
}
