//! Admin firm routes. Reads include inactive firms.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use propfirm_core::catalog::{Account, Firm, FirmInput, FirmRecord, Promotion};
use propfirm_db::{AccountRepository, FirmRepository, PromotionRepository};
use propfirm_shared::types::FirmId;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::response::ApiError;

/// Creates the admin firm routes (requires the admin middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/firms", get(list_firms))
        .route("/admin/firms", post(create_firm))
        .route("/admin/firms/{firm_id}", get(get_firm))
        .route("/admin/firms/{firm_id}", put(replace_firm))
        .route("/admin/firms/{firm_id}", delete(delete_firm))
        .route("/admin/firms/{firm_id}/accounts", get(list_accounts))
        .route("/admin/firms/{firm_id}/promotions", get(list_promotions))
}

async fn list_firms(State(state): State<AppState>) -> Result<Json<Vec<Firm>>, ApiError> {
    let repo = FirmRepository::new((*state.db).clone());
    Ok(Json(repo.list_all().await?))
}

async fn get_firm(
    State(state): State<AppState>,
    Path(firm_id): Path<Uuid>,
) -> Result<Json<FirmRecord>, ApiError> {
    let repo = FirmRepository::new((*state.db).clone());
    repo.find_record(FirmId::from_uuid(firm_id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Firm not found"))
}

async fn create_firm(
    State(state): State<AppState>,
    payload: Result<Json<FirmInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let repo = FirmRepository::new((*state.db).clone());

    let firm = repo.create(input).await?;
    state.cache.invalidate();
    info!(firm_id = %firm.id, slug = %firm.slug, "Admin created firm");

    Ok((StatusCode::CREATED, Json(firm)))
}

async fn replace_firm(
    State(state): State<AppState>,
    Path(firm_id): Path<Uuid>,
    payload: Result<Json<FirmInput>, JsonRejection>,
) -> Result<Json<Firm>, ApiError> {
    let Json(input) = payload?;
    let repo = FirmRepository::new((*state.db).clone());

    let firm = repo.update(FirmId::from_uuid(firm_id), input).await?;
    state.cache.invalidate();

    Ok(Json(firm))
}

async fn delete_firm(
    State(state): State<AppState>,
    Path(firm_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = FirmRepository::new((*state.db).clone());
    repo.delete(FirmId::from_uuid(firm_id)).await?;
    state.cache.invalidate();
    Ok(StatusCode::NO_CONTENT)
}

async fn list_accounts(
    State(state): State<AppState>,
    Path(firm_id): Path<Uuid>,
) -> Result<Json<Vec<Account>>, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    Ok(Json(repo.list_for_firm(FirmId::from_uuid(firm_id)).await?))
}

async fn list_promotions(
    State(state): State<AppState>,
    Path(firm_id): Path<Uuid>,
) -> Result<Json<Vec<Promotion>>, ApiError> {
    let repo = PromotionRepository::new((*state.db).clone());
    Ok(Json(repo.list_for_firm(FirmId::from_uuid(firm_id)).await?))
}
