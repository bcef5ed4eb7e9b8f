use chrono::Utc;
use uuid::Uuid;

use super::types::{Result, StoreError, User, UserRow};
use super::Database;
use crate::auth::Role;

impl Database {
    /// Insert a new user. A unique-constraint hit on the email column
    /// surfaces as [`StoreError::DuplicateEmail`].
    pub async fn create_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::DuplicateEmail(user.email.clone())
            }
            _ => StoreError::Database(e),
        })?;

        Ok(())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        let row: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::UserNotFound(id))?;

        row.try_into()
    }

    /// Look up a user by email (login path)
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.try_into()).transpose()
    }

    /// List all users, newest first
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Update a user's display name
    pub async fn update_user_name(&self, id: Uuid, name: Option<&str>) -> Result<()> {
        let result = sqlx::query("UPDATE users SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(id));
        }

        Ok(())
    }

    /// Change a user's role
    pub async fn set_user_role(&self, id: Uuid, role: Role) -> Result<()> {
        let result = sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(id));
        }

        Ok(())
    }

    /// Activate or deactivate an account. There is no hard delete.
    pub async fn set_user_active(&self, id: Uuid, active: bool) -> Result<()> {
        let result = sqlx::query("UPDATE users SET active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(id));
        }

        Ok(())
    }

    /// Number of active admin accounts
    pub async fn count_admins(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin' AND active = TRUE")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
