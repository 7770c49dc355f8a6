//! Admin promotion routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use propfirm_core::catalog::{Promotion, PromotionInput};
use propfirm_db::PromotionRepository;
use propfirm_shared::types::PromotionId;
use uuid::Uuid;

use crate::AppState;
use crate::response::ApiError;

/// Creates the admin promotion routes (requires the admin middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/promotions", post(create_promotion))
        .route("/admin/promotions/{promotion_id}", get(get_promotion))
        .route("/admin/promotions/{promotion_id}", put(replace_promotion))
        .route("/admin/promotions/{promotion_id}", delete(delete_promotion))
}

async fn get_promotion(
    State(state): State<AppState>,
    Path(promotion_id): Path<Uuid>,
) -> Result<Json<Promotion>, ApiError> {
    let repo = PromotionRepository::new((*state.db).clone());
    repo.find_by_id(PromotionId::from_uuid(promotion_id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Promotion not found"))
}

async fn create_promotion(
    State(state): State<AppState>,
    payload: Result<Json<PromotionInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let repo = PromotionRepository::new((*state.db).clone());

    let promotion = repo.create(input).await?;
    state.cache.invalidate();

    Ok((StatusCode::CREATED, Json(promotion)))
}

async fn replace_promotion(
    State(state): State<AppState>,
    Path(promotion_id): Path<Uuid>,
    payload: Result<Json<PromotionInput>, JsonRejection>,
) -> Result<Json<Promotion>, ApiError> {
    let Json(input) = payload?;
    let repo = PromotionRepository::new((*state.db).clone());

    let promotion = repo.update(PromotionId::from_uuid(promotion_id), input).await?;
    state.cache.invalidate();

    Ok(Json(promotion))
}

async fn delete_promotion(
    State(state): State<AppState>,
    Path(promotion_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = PromotionRepository::new((*state.db).clone());
    repo.delete(PromotionId::from_uuid(promotion_id)).await?;
    state.cache.invalidate();
    Ok(StatusCode::NO_CONTENT)
}
