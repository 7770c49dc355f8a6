//! Admin account routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use propfirm_core::catalog::{Account, AccountInput};
use propfirm_db::AccountRepository;
use propfirm_shared::types::AccountId;
use uuid::Uuid;

use crate::AppState;
use crate::response::ApiError;

/// Creates the admin account routes (requires the admin middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/accounts", post(create_account))
        .route("/admin/accounts/{account_id}", get(get_account))
        .route("/admin/accounts/{account_id}", put(replace_account))
        .route("/admin/accounts/{account_id}", delete(delete_account))
}

async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Account>, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    repo.find_by_id(AccountId::from_uuid(account_id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Account not found"))
}

async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<AccountInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let repo = AccountRepository::new((*state.db).clone());

    let account = repo.create(input).await?;
    state.cache.invalidate();

    Ok((StatusCode::CREATED, Json(account)))
}

async fn replace_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    payload: Result<Json<AccountInput>, JsonRejection>,
) -> Result<Json<Account>, ApiError> {
    let Json(input) = payload?;
    let repo = AccountRepository::new((*state.db).clone());

    let account = repo.update(AccountId::from_uuid(account_id), input).await?;
    state.cache.invalidate();

    Ok(Json(account))
}

async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    repo.delete(AccountId::from_uuid(account_id)).await?;
    state.cache.invalidate();
    Ok(StatusCode::NO_CONTENT)
}
