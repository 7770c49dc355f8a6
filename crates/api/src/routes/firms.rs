//! Public firm listing, detail, and page metadata routes.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};
use chrono::Utc;
use propfirm_core::catalog::FirmRecord;
use propfirm_core::listing::{FirmDetail, ListingQuery, ListingService, SortKey};
use propfirm_core::locale::Locale;
use propfirm_core::seo::PageMetadata;
use propfirm_db::FirmRepository;
use propfirm_shared::types::PageRequest;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::AppState;
use crate::response::{ApiError, LISTING_CACHE_CONTROL, cached_json};

/// Creates the public firm routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/firms", get(list_firms))
        .route("/firms/{slug}", get(get_firm))
        .route("/firms/{slug}/meta", get(get_firm_meta))
        .route("/meta/firms", get(get_listing_meta))
}

/// Query parameters for the firm listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFirmsQuery {
    /// Locale code; unknown codes fall back to English.
    pub locale: Option<String>,
    /// Sort key; unknown keys sort by name.
    pub sort: Option<String>,
    /// Account size in USD.
    pub size: Option<i32>,
    /// Trading platform, matched exactly.
    pub platform: Option<String>,
    /// Maximum days until first payout.
    pub max_payout_days: Option<i32>,
    /// Minimum current discount percentage.
    pub min_discount: Option<Decimal>,
    /// Page size.
    pub limit: Option<u32>,
    /// Items to skip.
    pub offset: Option<u32>,
}

impl ListFirmsQuery {
    /// Resolves raw parameters into a listing query.
    #[must_use]
    pub fn into_listing_query(self) -> ListingQuery {
        ListingQuery {
            locale: Locale::from_param(self.locale.as_deref()),
            sort: SortKey::from_param(self.sort.as_deref()),
            account_size: self.size,
            platform: self.platform.filter(|p| !p.is_empty()),
            max_payout_days: self.max_payout_days,
            min_discount: self.min_discount,
            page: PageRequest::from_params(self.limit, self.offset),
        }
    }
}

/// `?locale=` on single-resource reads.
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    /// Locale code; unknown codes fall back to English.
    pub locale: Option<String>,
}

impl LocaleQuery {
    pub(crate) fn locale(&self) -> Locale {
        Locale::from_param(self.locale.as_deref())
    }
}

async fn list_firms(
    State(state): State<AppState>,
    Query(query): Query<ListFirmsQuery>,
) -> Result<Response, ApiError> {
    let query = query.into_listing_query();
    let repo = FirmRepository::new((*state.db).clone());
    let records = state.cache.active_records(&repo).await?;

    let items = ListingService::list_firms(Vec::clone(&records), &query, Utc::now());
    Ok(cached_json(LISTING_CACHE_CONTROL, items))
}

async fn get_firm(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<Response, ApiError> {
    let detail = firm_detail(&state, &slug, query.locale()).await?;
    Ok(cached_json(LISTING_CACHE_CONTROL, detail))
}

async fn get_firm_meta(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<Response, ApiError> {
    let locale = query.locale();
    let detail = firm_detail(&state, &slug, locale).await?;
    Ok(cached_json(
        LISTING_CACHE_CONTROL,
        PageMetadata::for_firm(&detail, locale),
    ))
}

async fn get_listing_meta(Query(query): Query<LocaleQuery>) -> Response {
    cached_json(
        LISTING_CACHE_CONTROL,
        PageMetadata::for_listing(query.locale()),
    )
}

async fn firm_detail(
    state: &AppState,
    slug: &str,
    locale: Locale,
) -> Result<FirmDetail, ApiError> {
    let repo = FirmRepository::new((*state.db).clone());
    let record = state
        .cache
        .active_record(&repo, slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Firm not found"))?;

    ListingService::firm_detail(FirmRecord::clone(&record), locale, Utc::now())
        .ok_or_else(|| ApiError::not_found("Firm not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn parse(query: &str) -> ListingQuery {
        let uri: Uri = format!("/firms?{query}").parse().unwrap();
        let Query(raw) = Query::<ListFirmsQuery>::try_from_uri(&uri).unwrap();
        raw.into_listing_query()
    }

    #[test]
    fn test_defaults() {
        let query = parse("");
        assert_eq!(query.locale, Locale::En);
        assert_eq!(query.sort, SortKey::DiscountDesc);
        assert_eq!(query.page, PageRequest::default());
        assert!(query.platform.is_none());
    }

    #[test]
    fn test_all_parameters() {
        let query = parse(
            "locale=ko&sort=price_asc&size=50000&platform=cTrader&maxPayoutDays=7&minDiscount=15.5&limit=10&offset=20",
        );
        assert_eq!(query.locale, Locale::Ko);
        assert_eq!(query.sort, SortKey::PriceAsc);
        assert_eq!(query.account_size, Some(50_000));
        assert_eq!(query.platform.as_deref(), Some("cTrader"));
        assert_eq!(query.max_payout_days, Some(7));
        assert_eq!(query.min_discount, Some(dec!(15.5)));
        assert_eq!(query.page, PageRequest::from_params(Some(10), Some(20)));
    }

    #[rstest]
    #[case("sort=bogus", SortKey::Name)]
    #[case("sort=rating_desc", SortKey::RatingDesc)]
    fn test_sort_parsing(#[case] raw: &str, #[case] expected: SortKey) {
        assert_eq!(parse(raw).sort, expected);
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        assert_eq!(parse("locale=fr").locale, Locale::En);
    }
}
