use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::api::auth::authenticated_user;
use crate::api::requests::{CreateAccountRequest, CreateTransferRequest, ListAuditLogsQuery, ListLedgerEntriesQuery};
use crate::api::responses::{
    AccountResponse, ApiResponse, AuditLogResponse, ErrorResponse, HealthResponse,
    LedgerEntryResponse, PaginatedResponse, ServiceHealth, TransactionResponse,
};
use crate::error::AppError;
use crate::idempotency::IdempotencyKey;
use crate::observability::get_metrics;
use crate::repositories::{AuditRepository, LedgerRepository, TransactionRepository};
use crate::services::{AccountService, TransferExecutor, TransferRequest};

use super::routes::AppState;

type ErrResponse = (StatusCode, Json<ApiResponse<()>>);

fn internal_error(context: &str, err: AppError) -> ErrResponse {
    tracing::error!("{context}: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error(ErrorResponse::new(
            "INTERNAL_ERROR",
            "An internal error occurred",
        ))),
    )
}

fn map_app_error(context: &str, err: AppError) -> ErrResponse {
    match err {
        AppError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(ErrorResponse::new("NOT_FOUND", msg))),
        ),
        AppError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(ErrorResponse::new("VALIDATION_ERROR", msg))),
        ),
        AppError::Conflict(msg) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(ErrorResponse::new("CONFLICT", msg))),
        ),
        other => internal_error(context, other),
    }
}

// ============================================================================
// Health, readiness, liveness, metrics
// ============================================================================

pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    let response = HealthResponse {
        status: if db_healthy { "healthy".to_string() } else { "unhealthy".to_string() },
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        services: ServiceHealth { database: db_healthy },
    };

    Json(ApiResponse::success(response))
}

pub async fn detailed_health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<crate::observability::AggregatedHealth>>, ErrResponse> {
    let Some(checker) = &state.health_checker else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<()>::error(ErrorResponse::new(
                "HEALTH_CHECKER_UNAVAILABLE",
                "No health checker configured",
            ))),
        ));
    };

    Ok(Json(ApiResponse::success(checker.check_all().await)))
}

pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    let ready = match &state.health_checker {
        Some(checker) => checker.is_ready().await,
        None => sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok(),
    };

    if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

// ============================================================================
// Account endpoints — provisioning collaborator, outside the core
// ============================================================================

pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), ErrResponse> {
    let account_service = AccountService::new(state.pool.clone());

    let account = account_service
        .create_account(request.user_id)
        .await
        .map_err(|e| map_app_error("create_account", e))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(AccountResponse::from(account)))))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccountResponse>>, ErrResponse> {
    let account_service = AccountService::new(state.pool.clone());

    let account = account_service
        .find_by_id(id)
        .await
        .map_err(|e| map_app_error("get_account", e))?;

    Ok(Json(ApiResponse::success(AccountResponse::from(account))))
}

pub async fn freeze_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccountResponse>>, ErrResponse> {
    let account_service = AccountService::new(state.pool.clone());

    let account = account_service
        .freeze(id)
        .await
        .map_err(|e| map_app_error("freeze_account", e))?;

    Ok(Json(ApiResponse::success(AccountResponse::from(account))))
}

pub async fn unfreeze_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccountResponse>>, ErrResponse> {
    let account_service = AccountService::new(state.pool.clone());

    let account = account_service
        .unfreeze(id)
        .await
        .map_err(|e| map_app_error("unfreeze_account", e))?;

    Ok(Json(ApiResponse::success(AccountResponse::from(account))))
}

pub async fn terminate_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccountResponse>>, ErrResponse> {
    let account_service = AccountService::new(state.pool.clone());

    let account = account_service
        .terminate(id)
        .await
        .map_err(|e| map_app_error("terminate_account", e))?;

    Ok(Json(ApiResponse::success(AccountResponse::from(account))))
}

pub async fn get_account_ledger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListLedgerEntriesQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<LedgerEntryResponse>>>, ErrResponse> {
    let ledger_repo = LedgerRepository::new(state.pool.clone());
    let limit = query.limit.unwrap_or(50).min(100);
    let offset = query.offset.unwrap_or(0);

    let entries = ledger_repo
        .find_by_account(id, limit, offset)
        .await
        .map_err(|e| internal_error("get_account_ledger", e))?;

    let total = entries.len() as i64;
    let response_entries: Vec<LedgerEntryResponse> =
        entries.into_iter().map(LedgerEntryResponse::from).collect();

    Ok(Json(ApiResponse::success(PaginatedResponse::new(response_entries, total, limit, offset))))
}

// ============================================================================
// Transfer execution — the core
// ============================================================================

/// `POST /transfers` — the only write path that touches the transfer
/// executor. Idempotency key arrives as a header, not a body field;
/// `initiator_user_id` comes from the auth stand-in, never from the body.
pub async fn create_transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<crate::services::TransferResponse>>), ErrResponse> {
    let initiator_user_id = authenticated_user(&headers)?;

    let key_header = headers
        .get("Idempotency-Key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let idempotency_key = match IdempotencyKey::try_from(key_header) {
        Ok(key) => key,
        Err(err) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::error(ErrorResponse::new("VALIDATION_ERROR", err.to_string()))),
            ))
        }
    };

    let executor = TransferExecutor::new(state.pool.clone());

    let outcome = executor
        .execute_transfer(TransferRequest {
            initiator_user_id,
            from_account_id: request.from_account_id,
            to_account_id: request.to_account_id,
            amount: request.amount,
            idempotency_key: idempotency_key.into_uuid(),
        })
        .await;

    match outcome {
        Ok(response) if response.success => {
            get_metrics().record_transfer_succeeded();
            Ok((StatusCode::OK, Json(ApiResponse::success(response))))
        }
        Ok(response) => {
            if let Some(reason) = &response.reason {
                get_metrics().record_transfer_rejected(reason);
            }
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::success(response))))
        }
        Err(AppError::Validation(msg)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(ErrorResponse::new("VALIDATION_ERROR", msg))),
        )),
        Err(AppError::TransferSystemFailure(reason)) => {
            get_metrics().record_transfer_failed(&reason);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "TRANSFER_SYSTEM_FAILURE",
                    format!("TRANSFER_SYSTEM_FAILURE: {reason}"),
                ))),
            ))
        }
        Err(e) => Err(internal_error("create_transfer", e)),
    }
}

// ============================================================================
// Transaction and audit reads
// ============================================================================

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransactionResponse>>, ErrResponse> {
    let transaction_repo = TransactionRepository::new(state.pool.clone());

    let tx = transaction_repo
        .find_by_id(id)
        .await
        .map_err(|e| internal_error("get_transaction", e))?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "NOT_FOUND",
                    format!("transaction '{id}' not found"),
                ))),
            )
        })?;

    Ok(Json(ApiResponse::success(TransactionResponse::from(tx))))
}

pub async fn get_transaction_audit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListAuditLogsQuery>,
) -> Result<Json<ApiResponse<Vec<AuditLogResponse>>>, ErrResponse> {
    let audit_repo = AuditRepository::new(state.pool.clone());
    let limit = query.limit.unwrap_or(50).min(100);
    let offset = query.offset.unwrap_or(0);

    let logs = audit_repo
        .find_by_target(&id.to_string(), limit, offset)
        .await
        .map_err(|e| internal_error("get_transaction_audit", e))?;

    let response_logs: Vec<AuditLogResponse> = logs.into_iter().map(AuditLogResponse::from).collect();

    Ok(Json(ApiResponse::success(response_logs)))
}
