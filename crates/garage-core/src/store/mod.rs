//! SQLite persistence for the garage domain
//!
//! One pool, one schema, per-entity query impls split across submodules.

mod audit;
mod catalog;
mod favorites;
mod migrations;
mod staff;
mod types;
mod users;


pub use types::{AuditEntry, ServiceItem, StaffMember, StoreError, User};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use types::Result;

/// SQLite-backed database handle, cheap to clone.
#[derive(Clone)]
pub struct Database {
    pub(super) pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to a database URL and run migrations. The parent
    /// directory of a file-backed database is created if needed.
    pub async fn connect(url: &str) -> Result<Self> {
        ensure_parent_dir(url)?;

        // An in-memory SQLite database exists per connection; a pool of
        // them would give each query its own empty schema.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };

        // SQLite leaves declared ON DELETE CASCADE inert unless foreign
        // keys are switched on per connection.
        let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        info!("Database ready");
        Ok(db)
    }

    /// Access the underlying pool (health checks).
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

fn ensure_parent_dir(url: &str) -> Result<()> {
    let Some(file) = url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let file = file.split('?').next().unwrap_or(file);
    if file.is_empty() || file == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(file).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Setup(format!("failed to create data dir: {}", e)))?;
        }
    }

    Ok(())
}
