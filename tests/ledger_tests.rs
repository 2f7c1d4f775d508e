mod common;

use ledger_engine::models::{AuditOutcome, TransactionStatus};
use ledger_engine::repositories::{AuditRepository, LedgerRepository, TransactionRepository, UserRepository};
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
    let account = account_service.create_account(user_id).await.expect("failed to create account");
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

// Invariant: an account's current balance always equals the signed sum of its ledger entries.
#[tokio::test]
async fn test_balance_equals_sum_of_ledger_entries() {
    let pool = common::setup_test_db().await;
    common::cleanup_test_data(&pool).await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 10_000).await;
    let to = seed_account(&pool, user_id, 0).await;

    let executor = TransferExecutor::new(pool.clone());
    for amount in [1_000, 2_500, 500] {
        executor
            .execute_transfer(TransferRequest {
                initiator_user_id: user_id,
                from_account_id: from,
                to_account_id: to,
                amount,
                idempotency_key: Uuid::new_v4(),
            })
            .await
            .unwrap();
    }

    let account_service = AccountService::new(pool.clone());
    let ledger_repo = LedgerRepository::new(pool.clone());

    let from_balance = account_service.find_by_id(from).await.unwrap().current_balance;
    let from_entries = ledger_repo.find_by_account(from, 100, 0).await.unwrap();
    let from_sum: i64 = from_entries.iter().map(|e| e.amount).sum();
    assert_eq!(from_balance, 10_000 + from_sum);

    let to_balance = account_service.find_by_id(to).await.unwrap().current_balance;
    let to_entries = ledger_repo.find_by_account(to, 100, 0).await.unwrap();
    let to_sum: i64 = to_entries.iter().map(|e| e.amount).sum();
    assert_eq!(to_balance, to_sum);

    common::cleanup_test_data(&pool).await;
}

// Invariant: every successful transfer's ledger postings sum to zero.
#[tokio::test]
async fn test_successful_transfer_ledger_entries_sum_to_zero() {
    let pool = common::setup_test_db().await;
    common::cleanup_test_data(&pool).await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 4_000).await;
    let to = seed_account(&pool, user_id, 0).await;

    let executor = TransferExecutor::new(pool.clone());
    let response = executor
        .execute_transfer(TransferRequest {
            initiator_user_id: user_id,
            from_account_id: from,
            to_account_id: to,
            amount: 1_500,
            idempotency_key: Uuid::new_v4(),
        })
        .await
        .unwrap();

    let ledger_repo = LedgerRepository::new(pool.clone());
    let sum = ledger_repo.sum_by_transaction(response.transaction_id).await.unwrap();
    assert_eq!(sum, 0);

    common::cleanup_test_data(&pool).await;
}

// Invariant: a rejected transfer leaves no ledger trace.
#[tokio::test]
async fn test_rejected_transfer_leaves_no_ledger_entries() {
    let pool = common::setup_test_db().await;
    common::cleanup_test_data(&pool).await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 100).await;
    let to = seed_account(&pool, user_id, 0).await;

    let executor = TransferExecutor::new(pool.clone());
    let response = executor
        .execute_transfer(TransferRequest {
            initiator_user_id: user_id,
            from_account_id: from,
            to_account_id: to,
            amount: 10_000,
            idempotency_key: Uuid::new_v4(),
        })
        .await
        .unwrap();

    assert!(!response.success);

    let ledger_repo = LedgerRepository::new(pool.clone());
    assert!(ledger_repo.find_by_transaction(response.transaction_id).await.unwrap().is_empty());

    let transaction_repo = TransactionRepository::new(pool.clone());
    let record = transaction_repo.find_by_id(response.transaction_id).await.unwrap().unwrap();
    assert_eq!(record.status, TransactionStatus::Rejected);

    common::cleanup_test_data(&pool).await;
}

// Invariant: every transfer attempt produces an ATTEMPTED audit row followed by exactly one terminal audit row.
#[tokio::test]
async fn test_audit_trail_has_attempted_and_terminal_rows() {
    let pool = common::setup_test_db().await;
    common::cleanup_test_data(&pool).await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 5_000).await;
    let to = seed_account(&pool, user_id, 0).await;

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

    let audit_repo = AuditRepository::new(pool.clone());
    let rows = audit_repo.find_by_target(&response.transaction_id.to_string(), 10, 0).await.unwrap();
    assert_eq!(rows.len(), 2);

    let attempted = rows.iter().filter(|r| r.outcome == AuditOutcome::Attempted).count();
    let terminal = rows.iter().filter(|r| r.outcome != AuditOutcome::Attempted).count();
    assert_eq!(attempted, 1);
    assert_eq!(terminal, 1);

    common::cleanup_test_data(&pool).await;
}

// Invariant: account balances never go negative, regardless of attempted overdraft.
#[tokio::test]
async fn test_balance_never_goes_negative() {
    let pool = common::setup_test_db().await;
    common::cleanup_test_data(&pool).await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 100).await;
    let to = seed_account(&pool, user_id, 0).await;

    let executor = TransferExecutor::new(pool.clone());
    for _ in 0..5 {
        executor
            .execute_transfer(TransferRequest {
                initiator_user_id: user_id,
                from_account_id: from,
                to_account_id: to,
                amount: 1_000,
                idempotency_key: Uuid::new_v4(),
            })
            .await
            .unwrap();
    }

    let account_service = AccountService::new(pool.clone());
    let balance = account_service.find_by_id(from).await.unwrap().current_balance;
    assert!(balance >= 0);
    assert_eq!(balance, 100);

    common::cleanup_test_data(&pool).await;
}

// Invariant: replaying a transfer with the same idempotency key produces exactly one
// transactions row, one pair of ledger rows, and one pair of audit rows total.
#[tokio::test]
async fn test_idempotent_replay_produces_single_set_of_records() {
    let pool = common::setup_test_db().await;
    common::cleanup_test_data(&pool).await;
    let user_id = seed_user(&pool).await;
    let from = seed_account(&pool, user_id, 8_000).await;
    let to = seed_account(&pool, user_id, 1_000).await;
    let key = Uuid::new_v4();

    let executor = TransferExecutor::new(pool.clone());
    let request = TransferRequest {
        initiator_user_id: user_id,
        from_account_id: from,
        to_account_id: to,
        amount: 2_000,
        idempotency_key: key,
    };

    let first = executor.execute_transfer(request.clone()).await.unwrap();
    let second = executor.execute_transfer(request).await.unwrap();

    assert_eq!(first.transaction_id, second.transaction_id);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );

    let rows = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM transactions WHERE idempotency_key = $1",
    )
    .bind(key)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows, 1);

    let ledger_repo = LedgerRepository::new(pool.clone());
    assert_eq!(ledger_repo.find_by_transaction(first.transaction_id).await.unwrap().len(), 2);

    let audit_repo = AuditRepository::new(pool.clone());
    assert_eq!(
        audit_repo.find_by_target(&first.transaction_id.to_string(), 10, 0).await.unwrap().len(),
        2
    );

    common::cleanup_test_data(&pool).await;
}
