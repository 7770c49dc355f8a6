//! Active promotions feed.

use axum::{
    Router,
    extract::{Query, State},
    response::Response,
    routing::get,
};
use chrono::Utc;
use propfirm_core::listing::ListingService;
use propfirm_db::FirmRepository;

use super::firms::LocaleQuery;
use crate::AppState;
use crate::response::{ApiError, PROMOTIONS_CACHE_CONTROL, cached_json};

/// Creates the promotions routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/promotions", get(list_active_promotions))
}

/// Every promotion running right now across active firms, best discount first.
async fn list_active_promotions(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> Result<Response, ApiError> {
    let repo = FirmRepository::new((*state.db).clone());
    let records = state.cache.active_records(&repo).await?;

    let feed = ListingService::active_promotions(&records, query.locale(), Utc::now());
    Ok(cached_json(PROMOTIONS_CACHE_CONTROL, feed))
}
