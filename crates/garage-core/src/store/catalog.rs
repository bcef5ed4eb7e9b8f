use chrono::Utc;
use uuid::Uuid;

use super::types::{Result, ServiceItem, ServiceRow, StoreError};
use super::Database;

impl Database {
    /// Insert a catalog service
    pub async fn create_service(&self, service: &ServiceItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO services (id, name, description, price_cents, published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(service.id.to_string())
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price_cents)
        .bind(service.published)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a service by ID
    pub async fn get_service(&self, id: Uuid) -> Result<ServiceItem> {
        let row: ServiceRow = sqlx::query_as("SELECT * FROM services WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::ServiceNotFound(id))?;

        row.try_into()
    }

    /// List services by name. Unpublished entries are included only when
    /// the caller is an admin.
    pub async fn list_services(&self, include_unpublished: bool) -> Result<Vec<ServiceItem>> {
        let rows: Vec<ServiceRow> = if include_unpublished {
            sqlx::query_as("SELECT * FROM services ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_as("SELECT * FROM services WHERE published = TRUE ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?
        };

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Update a service
    pub async fn update_service(&self, service: &ServiceItem) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE services SET
                name = ?, description = ?, price_cents = ?, published = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price_cents)
        .bind(service.published)
        .bind(Utc::now())
        .bind(service.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ServiceNotFound(service.id));
        }

        Ok(())
    }

    /// Delete a service (favorites pointing at it cascade away)
    pub async fn delete_service(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ServiceNotFound(id));
        }

        Ok(())
    }
}
