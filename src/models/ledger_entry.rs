use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single signed movement against one account. Every transfer produces
/// exactly two entries whose amounts sum to zero: a negative entry
/// against the source account and a positive entry against the
/// destination account. The ledger, not `accounts.current_balance`, is
/// the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LedgerEntry {
    pub ledger_entry_id: Uuid,
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    /// Negative for a debit, positive for a credit. Never zero.
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates the debit-side entry for a transfer (negative amount).
    pub fn debit(transaction_id: Uuid, account_id: Uuid, amount: i64) -> Self {
        Self {
            ledger_entry_id: Uuid::new_v4(),
            transaction_id,
            account_id,
            amount: -amount,
            created_at: Utc::now(),
        }
    }

    /// Creates the credit-side entry for a transfer (positive amount).
    pub fn credit(transaction_id: Uuid, account_id: Uuid, amount: i64) -> Self {
        Self {
            ledger_entry_id: Uuid::new_v4(),
            transaction_id,
            account_id,
            amount,
            created_at: Utc::now(),
        }
    }
}
