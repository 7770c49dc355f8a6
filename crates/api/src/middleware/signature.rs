//! HMAC signature guard for bulk sync routes.
//!
//! Buffers the body, verifies `X-HMAC-Signature` over the raw bytes, and hands the
//! same bytes on to the handler.

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use propfirm_core::sync::{SIGNATURE_HEADER, verify};
use tracing::warn;

use crate::AppState;
use crate::response::ApiError;

/// Largest sync body accepted.
pub const MAX_SYNC_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Rejects requests without a valid signature for the configured sync secret.
///
/// When no secret is configured every request is refused.
pub async fn signature_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(secret) = state.sync.hmac_secret.as_deref().filter(|s| !s.is_empty()) else {
        warn!(path = %request.uri().path(), "Sync request refused: no HMAC secret configured");
        return ApiError::unauthorized("Sync is not configured").into_response();
    };

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_SYNC_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Failed to read sync body");
            return ApiError::bad_request("Request body could not be read").into_response();
        }
    };

    let header = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok());

    if let Err(e) = verify(secret.as_bytes(), &bytes, header) {
        warn!(path = %parts.uri.path(), error = %e, "Sync request rejected");
        return ApiError::unauthorized(e.to_string()).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
