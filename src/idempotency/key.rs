use std::fmt;

use uuid::Uuid;

/// A client-chosen token scoped to `(initiator, type=TRANSFER)` that makes
/// repeated submissions of the same transfer observationally identical to a
/// single submission. The schema types this column `UUID`, but it arrives
/// over the wire as a string header (`Idempotency-Key`); this newtype is the
/// edge-level parse/reject step, so a malformed key never reaches the
/// executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for IdempotencyKey {
    type Error = IdempotencyKeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IdempotencyKeyError::Missing);
        }
        Uuid::parse_str(trimmed)
            .map(IdempotencyKey)
            .map_err(|_| IdempotencyKeyError::Malformed(value.to_string()))
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum IdempotencyKeyError {
    #[error("MISSING_IDEMPOTENCY_KEY")]
    Missing,
    #[error("MALFORMED_IDEMPOTENCY_KEY: {0}")]
    Malformed(String),
}
