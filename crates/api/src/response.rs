//! Response helpers shared by the route modules.
//!
//! Errors render as `{ "error": <code>, "message": <text> }`; validation failures add
//! an `errors` array of `{ field, message }`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
};
use propfirm_core::catalog::{FieldError, ValidationFailure};
use propfirm_db::{AccountError, FirmError, PromotionError};
use propfirm_shared::AppError;
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// `Cache-Control` for firm listing and detail responses.
pub const LISTING_CACHE_CONTROL: &str = "public, s-maxage=3600, stale-while-revalidate=86400";

/// `Cache-Control` for the active promotions feed.
pub const PROMOTIONS_CACHE_CONTROL: &str = "public, s-maxage=1800, stale-while-revalidate=86400";

/// Serializes `body` as JSON with a public `Cache-Control` header.
pub fn cached_json<T: Serialize>(cache_control: &'static str, body: T) -> Response {
    let mut response = Json(body).into_response();
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static(cache_control));
    response
}

/// An error on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    field_errors: Vec<FieldError>,
}

impl ApiError {
    /// 404 with `message`.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into()).into()
    }

    /// 401 with `message`.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into()).into()
    }

    /// 400 with `message` and no field list.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::Validation(message.into()).into()
    }

    /// The underlying error.
    #[must_use]
    pub const fn error(&self) -> &AppError {
        &self.error
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            field_errors: Vec::new(),
        }
    }
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        Self {
            error: AppError::Validation("Request validation failed".to_string()),
            field_errors: failure.errors,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        AppError::Database(e.to_string()).into()
    }
}

impl From<FirmError> for ApiError {
    fn from(e: FirmError) -> Self {
        match e {
            FirmError::NotFound(_) => Self::not_found("Firm not found"),
            FirmError::DuplicateSlug(slug) => {
                AppError::Conflict(format!("Slug '{slug}' already exists")).into()
            }
            FirmError::Validation(failure) => failure.into(),
            FirmError::Database(db) => db.into(),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::NotFound(_) => Self::not_found("Account not found"),
            AccountError::FirmNotFound(_) => Self::not_found("Firm not found"),
            AccountError::DuplicateSize(size_usd) => {
                AppError::Conflict(format!("Firm already has a {size_usd} USD account")).into()
            }
            AccountError::Validation(failure) => failure.into(),
            AccountError::Database(db) => db.into(),
        }
    }
}

impl From<PromotionError> for ApiError {
    fn from(e: PromotionError) -> Self {
        match e {
            PromotionError::NotFound(_) => Self::not_found("Promotion not found"),
            PromotionError::FirmNotFound(_) => Self::not_found("Firm not found"),
            PromotionError::Validation(failure) => failure.into(),
            PromotionError::Database(db) => db.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.error, "Request failed");
        }

        let mut body = json!({
            "error": self.error.error_code(),
            "message": self.error.public_message(),
        });
        if !self.field_errors.is_empty() {
            body["errors"] = json!(self.field_errors);
        }

        (status, Json(body)).into_response()
    }
}
