use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a new account for an existing user. User
/// provisioning itself (registration, password hashing) is out of scope;
/// this assumes `user_id` already exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub user_id: Uuid,
}

/// Request body for `POST /transfers`. The idempotency key travels as a
/// separate `Idempotency-Key` header rather than a body field, since it
/// originates from a client-supplied header rather than the request shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransferRequest {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: i64,
}

/// Query parameters for listing an account's ledger entries.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListLedgerEntriesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for listing a transaction's audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListAuditLogsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
