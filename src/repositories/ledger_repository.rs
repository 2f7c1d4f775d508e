use crate::error::{AppError, Result};
use crate::models::LedgerEntry;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Repository for ledger entries. Entries are append-only: there is no
/// update or delete method, by design.
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &LedgerEntry,
    ) -> Result<LedgerEntry> {
        let row = sqlx::query_as::<_, LedgerEntry>(
            r#"
            INSERT INTO ledger_entries (ledger_entry_id, transaction_id, account_id, amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING ledger_entry_id, transaction_id, account_id, amount, created_at
            "#,
        )
        .bind(entry.ledger_entry_id)
        .bind(entry.transaction_id)
        .bind(entry.account_id)
        .bind(entry.amount)
        .bind(entry.created_at)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn find_by_transaction(&self, transaction_id: Uuid) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT ledger_entry_id, transaction_id, account_id, amount, created_at
            FROM ledger_entries
            WHERE transaction_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    pub async fn find_by_account(
        &self,
        account_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT ledger_entry_id, transaction_id, account_id, amount, created_at
            FROM ledger_entries
            WHERE account_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// Sums the signed entries for a transaction; a correctly-formed
    /// transfer always sums to zero.
    pub async fn sum_by_transaction(&self, transaction_id: Uuid) -> Result<i64> {
        let row: (Option<i64>,) = sqlx::query_as(
            r#"
            SELECT SUM(amount)
            FROM ledger_entries
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row.0.unwrap_or(0))
    }
}
