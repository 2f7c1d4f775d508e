pub mod key;

pub use key::{IdempotencyKey, IdempotencyKeyError};
