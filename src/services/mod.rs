pub mod account_service;
pub mod transfer_executor;

pub use account_service::AccountService;
pub use transfer_executor::{TransferExecutor, TransferRequest, TransferResponse};
