use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Operational state of an account. Only `Active` accounts can be
/// debited or credited by the transfer executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Frozen,
    Terminated,
}

impl AccountStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, AccountStatus::Active)
    }
}

/// A user-owned container of value. `current_balance` is a denormalized
/// cache of the sum of the account's ledger entries — the ledger is the
/// source of truth, this column exists so the conditional UPDATE in
/// `TransferExecutor` has something cheap to check and mutate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub status: AccountStatus,
    pub current_balance: i64,
    pub created_at: DateTime<Utc>,
    pub frozen_at: Option<DateTime<Utc>>,
    pub terminated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Creates a new, active account with a zero balance.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            account_id: Uuid::new_v4(),
            user_id,
            status: AccountStatus::Active,
            current_balance: 0,
            created_at: Utc::now(),
            frozen_at: None,
            terminated_at: None,
        }
    }

    pub fn freeze(&mut self) {
        self.status = AccountStatus::Frozen;
        self.frozen_at = Some(Utc::now());
    }

    pub fn terminate(&mut self) {
        self.status = AccountStatus::Terminated;
        self.terminated_at = Some(Utc::now());
    }
}
