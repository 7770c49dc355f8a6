//! Listing assembly.
//!
//! Pipeline order: price (promotion evaluation + discount) → filter → sort → paginate →
//! localize. Listing and detail share [`ListingService::price`], so both views always
//! agree on a firm's current price.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::filter::FirmFilter;
use super::pricing::{price_accounts, primary_account_index};
use super::promotion::{active_promotions, is_currently_active};
use super::sort::sort_firms;
use super::types::{
    ActivePromotion, FirmDetail, FirmListItem, FirmRef, FirmView, ListingQuery, PricedAccount,
    PricedFirm, PromotionView,
};
use crate::catalog::FirmRecord;
use crate::locale::Locale;

/// Listing service for the read-side pipeline.
pub struct ListingService;

impl ListingService {
    /// Evaluates promotions at `now` and prices every account of `record`.
    ///
    /// `account_size` selects the primary account; without it the first account is used.
    #[must_use]
    pub fn price(record: FirmRecord, account_size: Option<i32>, now: DateTime<Utc>) -> PricedFirm {
        let active: Vec<_> = active_promotions(&record.promotions, now)
            .into_iter()
            .cloned()
            .collect();
        let current_discount = active.first().map_or(Decimal::ZERO, |p| p.discount_pct);
        let current_prices = price_accounts(&record.accounts, current_discount);
        let primary_account = primary_account_index(&record.accounts, account_size);

        PricedFirm {
            record,
            active_promotions: active,
            current_discount,
            current_prices,
            primary_account,
        }
    }

    /// Runs the full listing pipeline over `records`.
    #[must_use]
    pub fn list_firms(
        records: Vec<FirmRecord>,
        query: &ListingQuery,
        now: DateTime<Utc>,
    ) -> Vec<FirmListItem> {
        let priced = records
            .into_iter()
            .map(|r| Self::price(r, query.account_size, now))
            .collect();

        let filtered = FirmFilter::from_query(query).apply(priced);
        let sorted = sort_firms(filtered, query.sort);

        query
            .page
            .apply(sorted)
            .iter()
            .map(|f| Self::list_item(f, query.locale))
            .collect()
    }

    /// Assembles the detail view, or `None` for an inactive firm.
    #[must_use]
    pub fn firm_detail(
        record: FirmRecord,
        locale: Locale,
        now: DateTime<Utc>,
    ) -> Option<FirmDetail> {
        if !record.firm.active {
            return None;
        }

        let priced = Self::price(record, None, now);

        let mut history: Vec<_> = priced.record.promotions.iter().collect();
        history.sort_by(|a, b| b.ends_at.cmp(&a.ends_at));
        let promotions = history
            .into_iter()
            .map(|p| PromotionView::localize(p, locale, is_currently_active(p, now)))
            .collect();

        Some(FirmDetail {
            firm: FirmView::localize(&priced.record.firm, locale),
            accounts: Self::priced_accounts(&priced),
            promotions,
            current_discount: priced.current_discount,
            final_price: priced.final_price(),
            countdown_end_time: priced.selected_promotion().map(|p| p.ends_at),
            outbound_url: Self::outbound_url(&priced),
        })
    }

    /// Every currently active promotion of every active firm, best discount first.
    #[must_use]
    pub fn active_promotions(
        records: &[FirmRecord],
        locale: Locale,
        now: DateTime<Utc>,
    ) -> Vec<ActivePromotion> {
        let mut feed: Vec<ActivePromotion> = records
            .iter()
            .filter(|r| r.firm.active)
            .flat_map(|r| {
                let firm = FirmRef {
                    id: r.firm.id,
                    name: r.firm.name.clone(),
                    slug: r.firm.slug.clone(),
                    logo_url: r.firm.logo_url.clone(),
                    referral_link: r.firm.referral_link.clone(),
                };
                r.promotions
                    .iter()
                    .filter(move |p| is_currently_active(p, now))
                    .map(move |p| ActivePromotion {
                        promotion: PromotionView::localize(p, locale, true),
                        firm: firm.clone(),
                    })
            })
            .collect();

        feed.sort_by(|a, b| {
            b.promotion
                .discount_pct
                .cmp(&a.promotion.discount_pct)
                .then_with(|| a.promotion.ends_at.cmp(&b.promotion.ends_at))
        });
        feed
    }

    /// The selected promotion's landing page, else the firm's referral link.
    #[must_use]
    pub fn outbound_url(firm: &PricedFirm) -> Option<String> {
        firm.selected_promotion()
            .and_then(|p| p.landing_url.clone())
            .or_else(|| firm.record.firm.referral_link.clone())
    }

    fn list_item(firm: &PricedFirm, locale: Locale) -> FirmListItem {
        FirmListItem {
            firm: FirmView::localize(&firm.record.firm, locale),
            accounts: Self::priced_accounts(firm),
            promotions: firm
                .active_promotions
                .iter()
                .map(|p| PromotionView::localize(p, locale, true))
                .collect(),
            current_discount: firm.current_discount,
            final_price: firm.final_price(),
            countdown_end_time: firm.selected_promotion().map(|p| p.ends_at),
            outbound_url: Self::outbound_url(firm),
        }
    }

    fn priced_accounts(firm: &PricedFirm) -> Vec<PricedAccount> {
        let parent = &firm.record.firm;
        firm.record
            .accounts
            .iter()
            .zip(&firm.current_prices)
            .map(|(account, current_price)| PricedAccount {
                id: account.id,
                firm_id: account.firm_id,
                size_usd: account.size_usd,
                base_price: account.base_price,
                current_price: *current_price,
                currency: account.currency.clone(),
                earliest_payout_days: parent.earliest_payout_days,
                payout_split: parent.payout_split.clone(),
            })
            .collect()
    }
}
