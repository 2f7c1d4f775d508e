use crate::error::{AppError, Result};
use crate::models::{Account, AccountStatus};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Repository for Account CRUD and balance mutation.
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, account: &Account) -> Result<Account> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (account_id, user_id, status, current_balance, created_at, frozen_at, terminated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING account_id, user_id, status, current_balance, created_at, frozen_at, terminated_at
            "#,
        )
        .bind(account.account_id)
        .bind(account.user_id)
        .bind(account.status)
        .bind(account.current_balance)
        .bind(account.created_at)
        .bind(account.frozen_at)
        .bind(account.terminated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn find_by_id(&self, account_id: Uuid) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, user_id, status, current_balance, created_at, frozen_at, terminated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Reads an account's current row from within an in-flight transaction,
    /// so the eligibility checker sees the same snapshot the mutator acts on.
    pub async fn find_by_id_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account_id: Uuid,
    ) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, user_id, status, current_balance, created_at, frozen_at, terminated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, user_id, status, current_balance, created_at, frozen_at, terminated_at
            FROM accounts
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    pub async fn update_status(
        &self,
        account_id: Uuid,
        status: AccountStatus,
    ) -> Result<Option<Account>> {
        // `Active` is reached only by unfreezing, so the same UPDATE clears
        // `frozen_at` rather than stamping it. `Frozen`/`Terminated` stamp
        // their own timestamp column and leave the other untouched.
        let query = match status {
            AccountStatus::Active => {
                r#"
                UPDATE accounts
                SET status = $2, frozen_at = NULL
                WHERE account_id = $1
                RETURNING account_id, user_id, status, current_balance, created_at, frozen_at, terminated_at
                "#
            }
            AccountStatus::Frozen => {
                r#"
                UPDATE accounts
                SET status = $2, frozen_at = NOW()
                WHERE account_id = $1
                RETURNING account_id, user_id, status, current_balance, created_at, frozen_at, terminated_at
                "#
            }
            AccountStatus::Terminated => {
                r#"
                UPDATE accounts
                SET status = $2, terminated_at = NOW()
                WHERE account_id = $1
                RETURNING account_id, user_id, status, current_balance, created_at, frozen_at, terminated_at
                "#
            }
        };

        let row = sqlx::query_as::<_, Account>(query)
            .bind(account_id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Debits `amount` from an active account, conditional on sufficient
    /// balance. Returns `true` iff the row was affected — the caller
    /// interprets a `false` as insufficient funds or a non-active account,
    /// without a second round trip to find out which.
    pub async fn debit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account_id: Uuid,
        amount: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET current_balance = current_balance - $2
            WHERE account_id = $1
              AND status = 'ACTIVE'
              AND current_balance >= $2
            "#,
        )
        .bind(account_id)
        .bind(amount)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Credits `amount` to an active account. Returns `true` iff the row
    /// was affected.
    pub async fn credit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account_id: Uuid,
        amount: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET current_balance = current_balance + $2
            WHERE account_id = $1
              AND status = 'ACTIVE'
            "#,
        )
        .bind(account_id)
        .bind(amount)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

}
