use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use uuid::Uuid;

use crate::api::responses::{ApiResponse, ErrorResponse};

/// Deliberately trivial stand-in for session-based authentication, which is
/// out of scope for this service. Reads `initiator_user_id` from an
/// `X-User-Id` header. This is not a security boundary — it exists only so
/// the transfer executor has a trustworthy-looking caller identity in a
/// runnable service; a real deployment replaces this wholesale with
/// whatever the session layer produces.
pub fn authenticated_user(headers: &HeaderMap) -> Result<Uuid, (StatusCode, Json<ApiResponse<()>>)> {
    let header = headers
        .get("X-User-Id")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(ErrorResponse::new(
                    "MISSING_USER_ID",
                    "X-User-Id header is required",
                ))),
            )
        })?;

    Uuid::parse_str(header).map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(ErrorResponse::new(
                "INVALID_USER_ID",
                "X-User-Id header is not a valid UUID",
            ))),
        )
    })
}
