use crate::error::{AppError, Result};
use crate::models::{Account, AccountStatus};
use crate::repositories::AccountRepository;
use sqlx::PgPool;
use uuid::Uuid;

/// CRUD and lifecycle operations on accounts. Balance mutation lives on
/// `TransferExecutor`, not here — this service never touches
/// `current_balance`.
pub struct AccountService {
    account_repo: AccountRepository,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            account_repo: AccountRepository::new(pool),
        }
    }

    pub async fn create_account(&self, user_id: Uuid) -> Result<Account> {
        let account = Account::new(user_id);
        self.account_repo.create(&account).await
    }

    pub async fn find_by_id(&self, account_id: Uuid) -> Result<Account> {
        self.account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account '{}' not found", account_id)))
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Account>> {
        self.account_repo.find_by_user(user_id).await
    }

    pub async fn freeze(&self, account_id: Uuid) -> Result<Account> {
        let account = self.find_by_id(account_id).await?;

        if account.status == AccountStatus::Terminated {
            return Err(AppError::Conflict("cannot freeze a terminated account".to_string()));
        }
        if account.status == AccountStatus::Frozen {
            return Err(AppError::Conflict("account is already frozen".to_string()));
        }

        self.account_repo
            .update_status(account_id, AccountStatus::Frozen)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account '{}' not found", account_id)))
    }

    pub async fn unfreeze(&self, account_id: Uuid) -> Result<Account> {
        let account = self.find_by_id(account_id).await?;

        if account.status != AccountStatus::Frozen {
            return Err(AppError::Conflict("account is not frozen".to_string()));
        }

        self.account_repo
            .update_status(account_id, AccountStatus::Active)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account '{}' not found", account_id)))
    }

    pub async fn terminate(&self, account_id: Uuid) -> Result<Account> {
        let account = self.find_by_id(account_id).await?;

        if account.status == AccountStatus::Terminated {
            return Err(AppError::Conflict("account is already terminated".to_string()));
        }
        if account.current_balance != 0 {
            return Err(AppError::Conflict(
                "cannot terminate an account with a non-zero balance".to_string(),
            ));
        }

        self.account_repo
            .update_status(account_id, AccountStatus::Terminated)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account '{}' not found", account_id)))
    }
}
