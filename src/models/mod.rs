pub mod account;
pub mod audit_log;
pub mod ledger_entry;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountStatus};
pub use audit_log::{ActorType, AuditLog, AuditOutcome, TargetType};
pub use ledger_entry::LedgerEntry;
pub use transaction::{TransactionRecord, TransactionStatus, TransactionType};
pub use user::User;
