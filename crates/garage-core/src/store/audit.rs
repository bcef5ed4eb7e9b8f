use chrono::Utc;
use uuid::Uuid;

use super::types::{AuditEntry, AuditRow, Result};
use super::Database;

impl Database {
    /// Append an audit entry. Audit writes must never fail a request, so
    /// callers log and swallow errors from this.
    pub async fn record_audit(
        &self,
        actor_id: Option<Uuid>,
        action: &str,
        entity: &str,
        detail: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, actor_id, action, entity, detail, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(actor_id.map(|id| id.to_string()))
        .bind(action)
        .bind(entity)
        .bind(detail)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent audit entries
    pub async fn list_audit(&self, limit: i64) -> Result<Vec<AuditEntry>> {
        let rows: Vec<AuditRow> =
            sqlx::query_as("SELECT * FROM audit_log ORDER BY created_at DESC LIMIT ?")
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}
