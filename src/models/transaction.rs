use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Transaction type. The transfer executor only handles `Transfer`;
/// `Deposit` and `Withdrawal` are reserved table shapes (see the `type`
/// CHECK constraint in the migration) with no implementing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Transfer,
    Deposit,
    Withdrawal,
}

/// Lifecycle status of a transaction. `Pending` is a transient,
/// in-transaction state — it is never visible to a reader outside the
/// executor on a committed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Succeeded,
    Rejected,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

/// A recorded intent to move value, plus its outcome. Not to be confused
/// with the database transaction that admits it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransactionRecord {
    pub transaction_id: Uuid,
    pub status: TransactionStatus,
    #[sqlx(rename = "type")]
    pub transaction_type: TransactionType,
    pub initiator_user_id: Uuid,
    pub from_account_id: Option<Uuid>,
    pub to_account_id: Option<Uuid>,
    pub amount: i64,
    pub idempotency_key: Option<Uuid>,
    pub response_payload: Option<serde_json::Value>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Builds a new PENDING transfer row, ready for admission-insert.
    pub fn new_transfer(
        initiator_user_id: Uuid,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: i64,
        idempotency_key: Uuid,
    ) -> Self {
        Self::new_transfer_with_id(
            Uuid::new_v4(),
            initiator_user_id,
            from_account_id,
            to_account_id,
            amount,
            idempotency_key,
        )
    }

    /// Same as [`new_transfer`](Self::new_transfer) but with a caller-chosen
    /// id, so the executor can generate the id before opening a database
    /// transaction and reuse it for a compensating write on fault.
    pub fn new_transfer_with_id(
        transaction_id: Uuid,
        initiator_user_id: Uuid,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: i64,
        idempotency_key: Uuid,
    ) -> Self {
        Self {
            transaction_id,
            status: TransactionStatus::Pending,
            transaction_type: TransactionType::Transfer,
            initiator_user_id,
            from_account_id: Some(from_account_id),
            to_account_id: Some(to_account_id),
            amount,
            idempotency_key: Some(idempotency_key),
            response_payload: None,
            failure_reason: None,
            created_at: Utc::now(),
        }
    }
}
