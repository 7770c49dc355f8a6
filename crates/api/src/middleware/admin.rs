//! Bearer token guard for admin CRUD routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use propfirm_core::sync::tokens_match;
use tracing::warn;

use crate::AppState;
use crate::response::ApiError;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Rejects requests whose bearer token does not match `admin.api_token`.
///
/// When no token is configured every request is refused.
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.admin.api_token.as_deref().filter(|t| !t.is_empty()) else {
        warn!(path = %request.uri().path(), "Admin request refused: no admin token configured");
        return ApiError::unauthorized("Admin access is not configured").into_response();
    };

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token);

    match token {
        Some(token) if tokens_match(expected, token) => next.run(request).await,
        Some(_) => {
            warn!(path = %request.uri().path(), "Admin request with invalid token");
            ApiError::unauthorized("Invalid admin token").into_response()
        }
        None => ApiError::unauthorized("Authorization header with Bearer token is required")
            .into_response(),
    }
}
