use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Who performed the audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "actor_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorType {
    User,
    Service,
    System,
}

/// What kind of entity the audited action targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "target_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Account,
    Transaction,
    Session,
    User,
}

/// Result of the audited action at the time the row was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_outcome", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    Attempted,
    Succeeded,
    Rejected,
    Failed,
}

/// An immutable record of an action taken against the system. The
/// transfer executor writes one ATTEMPTED row on admission and one
/// terminal row (SUCCEEDED/REJECTED/FAILED) in the same transaction as
/// the transaction's own status update, so the two are never observed
/// out of sync. `actor_id` is text, not a UUID column, because a
/// SYSTEM-attributed row uses the literal label `TRANSFER_SERVICE`
/// rather than an identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLog {
    pub audit_log_id: Uuid,
    pub actor_type: ActorType,
    pub actor_id: String,
    pub action: String,
    pub target_type: TargetType,
    pub target_id: Option<String>,
    pub outcome: AuditOutcome,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        actor_type: ActorType,
        actor_id: impl Into<String>,
        action: impl Into<String>,
        target_type: TargetType,
        target_id: Option<String>,
        outcome: AuditOutcome,
        reason: Option<String>,
    ) -> Self {
        Self {
            audit_log_id: Uuid::new_v4(),
            actor_type,
            actor_id: actor_id.into(),
            action: action.into(),
            target_type,
            target_id,
            outcome,
            reason,
            created_at: Utc::now(),
        }
    }
}
