use crate::error::{AppError, Result};
use crate::models::AuditLog;
use sqlx::{PgPool, Postgres, Transaction};

/// Repository for audit log entries. Written inside the same
/// transaction as the domain state it describes, so an ATTEMPTED row
/// and its eventual terminal row are never observed without the
/// transaction they narrate.
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &AuditLog,
    ) -> Result<AuditLog> {
        let row = sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (
                audit_log_id, actor_type, actor_id, action, target_type,
                target_id, outcome, reason, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING audit_log_id, actor_type, actor_id, action, target_type,
                      target_id, outcome, reason, created_at
            "#,
        )
        .bind(entry.audit_log_id)
        .bind(entry.actor_type)
        .bind(&entry.actor_id)
        .bind(&entry.action)
        .bind(entry.target_type)
        .bind(&entry.target_id)
        .bind(entry.outcome)
        .bind(&entry.reason)
        .bind(entry.created_at)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn find_by_target(
        &self,
        target_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLog>> {
        let rows = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT audit_log_id, actor_type, actor_id, action, target_type,
                   target_id, outcome, reason, created_at
            FROM audit_logs
            WHERE target_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(target_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    pub async fn find_by_actor(&self, actor_id: &str, limit: i64, offset: i64) -> Result<Vec<AuditLog>> {
        let rows = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT audit_log_id, actor_type, actor_id, action, target_type,
                   target_id, outcome, reason, created_at
            FROM audit_logs
            WHERE actor_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(actor_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }
}
