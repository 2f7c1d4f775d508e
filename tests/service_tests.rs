mod common;

use ledger_engine::models::AccountStatus;
use ledger_engine::repositories::{AuditRepository, LedgerRepository, UserRepository};
use ledger_engine::services::{AccountService, TransferExecutor, TransferRequest};
use sqlx::PgPool;
use uuid::Uuid;

async fn seed_user(pool: &PgPool) -> Uuid {
    let user_repo = UserRepository::new(pool.clone());
    let user = ledger_engine::models::User::new(
        format!("user-{}", Uuid::new_v4()),
        "unused-hash".to_string(),
    );
    user_repo.create(&user).await.expect("failed to create user");
    user.id
}

async fn seed_account(pool: &PgPool, user_id: Uuid, initial_balance: i64) -> Uuid {
    let account_service = AccountService::new(pool.clone());
    let account = account_service
        .create_account(user_id)
        .await
        .expect("failed to create account");

    if initial_balance > 0 {
        sqlx::query("UPDATE accounts SET current_balance = $2 WHERE account_id = $1")
            .bind(account.account_id)
            .bind(initial_balance)
            .execute(pool)
            .await
            .expect("failed to seed balance");
    }

    account.account_id
}

// Scenario 1 — success.
#[tokio::test]
async fn test_successful_transfer_moves_balances_and_writes_records() {
    let pool = common::setup_test_db().await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 10_000).await;
    let to = seed_account(&pool, user_id, 5_000).await;

    let executor = TransferExecutor::new(pool.clone());
    let response = executor
        .execute_transfer(TransferRequest {
            initiator_user_id: user_id,
            from_account_id: from,
            to_account_id: to,
            amount: 3_000,
            idempotency_key: Uuid::new_v4(),
        })
        .await
        .expect("transfer should succeed");

    assert!(response.success);
    assert_eq!(response.amount, Some(3_000));

    let account_service = AccountService::new(pool.clone());
    let from_account = account_service.find_by_id(from).await.unwrap();
    let to_account = account_service.find_by_id(to).await.unwrap();
    assert_eq!(from_account.current_balance, 7_000);
    assert_eq!(to_account.current_balance, 8_000);

    let ledger_repo = LedgerRepository::new(pool.clone());
    let entries = ledger_repo.find_by_transaction(response.transaction_id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries.iter().map(|e| e.amount).sum::<i64>(), 0);

    let audit_repo = AuditRepository::new(pool.clone());
    let audit_rows = audit_repo
        .find_by_target(&response.transaction_id.to_string(), 10, 0)
        .await
        .unwrap();
    assert_eq!(audit_rows.len(), 2);

    common::cleanup_test_data(&pool).await;
}

// Scenario 2 — insufficient funds.
#[tokio::test]
async fn test_insufficient_funds_is_rejected_without_moving_balances() {
    let pool = common::setup_test_db().await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 500).await;
    let to = seed_account(&pool, user_id, 2_000).await;

    let executor = TransferExecutor::new(pool.clone());
    let response = executor
        .execute_transfer(TransferRequest {
            initiator_user_id: user_id,
            from_account_id: from,
            to_account_id: to,
            amount: 1_000,
            idempotency_key: Uuid::new_v4(),
        })
        .await
        .expect("rejection is not a fault");

    assert!(!response.success);
    assert_eq!(response.reason.as_deref(), Some("INSUFFICIENT_FUNDS"));

    let account_service = AccountService::new(pool.clone());
    assert_eq!(account_service.find_by_id(from).await.unwrap().current_balance, 500);
    assert_eq!(account_service.find_by_id(to).await.unwrap().current_balance, 2_000);

    let ledger_repo = LedgerRepository::new(pool.clone());
    assert!(ledger_repo
        .find_by_transaction(response.transaction_id)
        .await
        .unwrap()
        .is_empty());

    common::cleanup_test_data(&pool).await;
}

// Scenario 3 — from account frozen.
#[tokio::test]
async fn test_frozen_from_account_is_rejected() {
    let pool = common::setup_test_db().await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 5_000).await;
    let to = seed_account(&pool, user_id, 2_000).await;

    let account_service = AccountService::new(pool.clone());
    account_service.freeze(from).await.unwrap();

    let executor = TransferExecutor::new(pool.clone());
    let response = executor
        .execute_transfer(TransferRequest {
            initiator_user_id: user_id,
            from_account_id: from,
            to_account_id: to,
            amount: 1_000,
            idempotency_key: Uuid::new_v4(),
        })
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.reason.as_deref(), Some("FROM_ACCOUNT_NOT_ACTIVE"));
    assert_eq!(account_service.find_by_id(from).await.unwrap().current_balance, 5_000);
    assert_eq!(account_service.find_by_id(to).await.unwrap().current_balance, 2_000);

    common::cleanup_test_data(&pool).await;
}

// Scenario 4 — to account frozen.
#[tokio::test]
async fn test_frozen_to_account_is_rejected() {
    let pool = common::setup_test_db().await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 5_000).await;
    let to = seed_account(&pool, user_id, 2_000).await;

    let account_service = AccountService::new(pool.clone());
    account_service.freeze(to).await.unwrap();

    let executor = TransferExecutor::new(pool.clone());
    let response = executor
        .execute_transfer(TransferRequest {
            initiator_user_id: user_id,
            from_account_id: from,
            to_account_id: to,
            amount: 1_000,
            idempotency_key: Uuid::new_v4(),
        })
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.reason.as_deref(), Some("TO_ACCOUNT_NOT_ACTIVE"));
    assert_eq!(account_service.find_by_id(from).await.unwrap().current_balance, 5_000);

    common::cleanup_test_data(&pool).await;
}

#[tokio::test]
async fn test_transfer_rejects_zero_amount_before_touching_database() {
    let pool = common::setup_test_db().await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 1_000).await;
    let to = seed_account(&pool, user_id, 0).await;

    let executor = TransferExecutor::new(pool.clone());
    let result = executor
        .execute_transfer(TransferRequest {
            initiator_user_id: user_id,
            from_account_id: from,
            to_account_id: to,
            amount: 0,
            idempotency_key: Uuid::new_v4(),
        })
        .await;

    assert!(result.is_err());

    common::cleanup_test_data(&pool).await;
}

#[tokio::test]
async fn test_transfer_rejects_same_account() {
    let pool = common::setup_test_db().await;
    let user_id = seed_user(&pool).await;
    let account = seed_account(&pool, user_id, 1_000).await;

    let executor = TransferExecutor::new(pool.clone());
    let result = executor
        .execute_transfer(TransferRequest {
            initiator_user_id: user_id,
            from_account_id: account,
            to_account_id: account,
            amount: 100,
            idempotency_key: Uuid::new_v4(),
        })
        .await;

    assert!(result.is_err());

    common::cleanup_test_data(&pool).await;
}

#[tokio::test]
async fn test_transfer_rejects_unknown_accounts() {
    let pool = common::setup_test_db().await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 1_000).await;

    let executor = TransferExecutor::new(pool.clone());
    let response = executor
        .execute_transfer(TransferRequest {
            initiator_user_id: user_id,
            from_account_id: from,
            to_account_id: Uuid::new_v4(),
            amount: 100,
            idempotency_key: Uuid::new_v4(),
        })
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.reason.as_deref(), Some("TO_ACCOUNT_NOT_FOUND"));

    common::cleanup_test_data(&pool).await;
}

#[tokio::test]
async fn test_account_service_lifecycle() {
    let pool = common::setup_test_db().await;
    let user_id = seed_user(&pool).await;
    let account_service = AccountService::new(pool.clone());

    let account = account_service.create_account(user_id).await.unwrap();
    assert_eq!(account.status, AccountStatus::Active);

    let frozen = account_service.freeze(account.account_id).await.unwrap();
    assert_eq!(frozen.status, AccountStatus::Frozen);
    assert!(account_service.freeze(account.account_id).await.is_err());

    let unfrozen = account_service.unfreeze(account.account_id).await.unwrap();
    assert_eq!(unfrozen.status, AccountStatus::Active);

    let terminated = account_service.terminate(account.account_id).await.unwrap();
    assert_eq!(terminated.status, AccountStatus::Terminated);

    common::cleanup_test_data(&pool).await;
}

#[tokio::test]
async fn test_account_cannot_be_terminated_with_nonzero_balance() {
    let pool = common::setup_test_db().await;
    let user_id = seed_user(&pool).await;
    let account_id = seed_account(&pool, user_id, 500).await;

    let account_service = AccountService::new(pool.clone());
    assert!(account_service.terminate(account_id).await.is_err());

    common::cleanup_test_data(&pool).await;
}
