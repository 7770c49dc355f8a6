//! Bulk sync routes for the content pipeline.
//!
//! Both endpoints take a JSON array of partial entities and answer with
//! `{ success, errors }`. Signature checks happen in the middleware.

use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use propfirm_core::sync::{SyncReport, parse_batch};
use propfirm_db::SyncRepository;
use serde_json::Value;
use tracing::info;

use crate::AppState;
use crate::response::ApiError;

/// Creates the sync routes (requires the signature middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/firms/sync", post(sync_firms))
        .route("/admin/promotions/sync", post(sync_promotions))
}

fn batch(body: &[u8]) -> Result<Vec<Value>, ApiError> {
    parse_batch(body).map_err(|e| ApiError::bad_request(format!("Expected a JSON array: {e}")))
}

async fn sync_firms(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SyncReport>, ApiError> {
    let items = batch(&body)?;
    let total = items.len();

    let report = SyncRepository::new((*state.db).clone())
        .sync_firms(items)
        .await;
    state.cache.invalidate();

    info!(total, success = report.success, failed = report.errors.len(), "Firm sync finished");
    Ok(Json(report))
}

async fn sync_promotions(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SyncReport>, ApiError> {
    let items = batch(&body)?;
    let total = items.len();

    let report = SyncRepository::new((*state.db).clone())
        .sync_promotions(items)
        .await;
    state.cache.invalidate();

    info!(total, success = report.success, failed = report.errors.len(), "Promotion sync finished");
    Ok(Json(report))
}
