use crate::error::{AppError, Result};
use crate::models::{TransactionRecord, TransactionStatus};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Repository for transaction admission, status transitions, and reads.
/// The `_in_tx` methods take an in-flight transaction — a
/// `TransactionRecord` is never mutated outside the executor's own
/// atomic unit of work. The plain methods read from the pool for API
/// handlers that have no open transaction of their own.
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a PENDING transaction row. Idempotency is enforced by a
    /// unique partial index on `(initiator_user_id, idempotency_key)`
    /// where `type = 'TRANSFER'`; a violation surfaces as a unique
    /// constraint error, which the caller maps back to the existing row.
    pub async fn insert_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: &TransactionRecord,
    ) -> Result<TransactionRecord> {
        let row = sqlx::query_as::<_, TransactionRecord>(
            r#"
            INSERT INTO transactions (
                transaction_id, status, type, initiator_user_id,
                from_account_id, to_account_id, amount, idempotency_key,
                response_payload, failure_reason, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING transaction_id, status, type, initiator_user_id,
                      from_account_id, to_account_id, amount, idempotency_key,
                      response_payload, failure_reason, created_at
            "#,
        )
        .bind(record.transaction_id)
        .bind(record.status)
        .bind(record.transaction_type)
        .bind(record.initiator_user_id)
        .bind(record.from_account_id)
        .bind(record.to_account_id)
        .bind(record.amount)
        .bind(record.idempotency_key)
        .bind(&record.response_payload)
        .bind(&record.failure_reason)
        .bind(record.created_at)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Looks up a prior transfer by its idempotency key, scoped to the
    /// initiating user. Used both to short-circuit a retried request and,
    /// on a unique-violation race, to fetch the row the loser collided
    /// with.
    pub async fn find_by_idempotency_key_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        initiator_user_id: Uuid,
        idempotency_key: Uuid,
    ) -> Result<Option<TransactionRecord>> {
        let row = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT transaction_id, status, type, initiator_user_id,
                   from_account_id, to_account_id, amount, idempotency_key,
                   response_payload, failure_reason, created_at
            FROM transactions
            WHERE initiator_user_id = $1
              AND idempotency_key = $2
              AND type = 'TRANSFER'
            "#,
        )
        .bind(initiator_user_id)
        .bind(idempotency_key)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Moves a transaction to a terminal status, recording the response
    /// payload and, on rejection or failure, the reason.
    pub async fn finalize_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transaction_id: Uuid,
        status: TransactionStatus,
        response_payload: Option<serde_json::Value>,
        failure_reason: Option<String>,
    ) -> Result<TransactionRecord> {
        let row = sqlx::query_as::<_, TransactionRecord>(
            r#"
            UPDATE transactions
            SET status = $2, response_payload = $3, failure_reason = $4
            WHERE transaction_id = $1
            RETURNING transaction_id, status, type, initiator_user_id,
                      from_account_id, to_account_id, amount, idempotency_key,
                      response_payload, failure_reason, created_at
            "#,
        )
        .bind(transaction_id)
        .bind(status)
        .bind(response_payload)
        .bind(failure_reason)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn find_by_id(&self, transaction_id: Uuid) -> Result<Option<TransactionRecord>> {
        let row = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT transaction_id, status, type, initiator_user_id,
                   from_account_id, to_account_id, amount, idempotency_key,
                   response_payload, failure_reason, created_at
            FROM transactions
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn find_by_account(
        &self,
        account_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TransactionRecord>> {
        let rows = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT transaction_id, status, type, initiator_user_id,
                   from_account_id, to_account_id, amount, idempotency_key,
                   response_payload, failure_reason, created_at
            FROM transactions
            WHERE from_account_id = $1 OR to_account_id = $1
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
}
