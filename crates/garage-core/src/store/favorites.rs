use chrono::Utc;
use uuid::Uuid;

use super::types::{Result, ServiceItem, ServiceRow, StoreError};
use super::Database;

impl Database {
    /// Add a favorite. Idempotent: favoriting the same service twice is
    /// not an error. The service must exist and be published.
    pub async fn add_favorite(&self, user_id: Uuid, service_id: Uuid) -> Result<()> {
        let service = self.get_service(service_id).await?;
        if !service.published {
            return Err(StoreError::ServiceNotFound(service_id));
        }

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO favorites (user_id, service_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id.to_string())
        .bind(service_id.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a favorite. Idempotent: removing an absent row is a no-op.
    pub async fn remove_favorite(&self, user_id: Uuid, service_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM favorites WHERE user_id = ? AND service_id = ?")
            .bind(user_id.to_string())
            .bind(service_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// The services a user has favorited, most recent first
    pub async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<ServiceItem>> {
        let rows: Vec<ServiceRow> = sqlx::query_as(
            r#"
            SELECT s.* FROM services s
            JOIN favorites f ON f.service_id = s.id
            WHERE f.user_id = ?
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}
