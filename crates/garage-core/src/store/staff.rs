use chrono::Utc;
use uuid::Uuid;

use super::types::{Result, StaffMember, StaffRow, StoreError};
use super::Database;

impl Database {
    /// Insert a staff member
    pub async fn create_staff(&self, member: &StaffMember) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO staff (id, name, title, bio, position, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(member.id.to_string())
        .bind(&member.name)
        .bind(&member.title)
        .bind(&member.bio)
        .bind(member.position)
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a staff member by ID
    pub async fn get_staff(&self, id: Uuid) -> Result<StaffMember> {
        let row: StaffRow = sqlx::query_as("SELECT * FROM staff WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::StaffNotFound(id))?;

        row.try_into()
    }

    /// List staff in display order
    pub async fn list_staff(&self) -> Result<Vec<StaffMember>> {
        let rows: Vec<StaffRow> =
            sqlx::query_as("SELECT * FROM staff ORDER BY position ASC, name ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Update a staff member
    pub async fn update_staff(&self, member: &StaffMember) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE staff SET name = ?, title = ?, bio = ?, position = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&member.name)
        .bind(&member.title)
        .bind(&member.bio)
        .bind(member.position)
        .bind(Utc::now())
        .bind(member.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::StaffNotFound(member.id));
        }

        Ok(())
    }

    /// Delete a staff member
    pub async fn delete_staff(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM staff WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::StaffNotFound(id));
        }

        Ok(())
    }
}
