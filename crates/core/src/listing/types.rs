//! Listing query and response types.

use chrono::{DateTime, Utc};
use propfirm_shared::types::{AccountId, FirmId, PageRequest, PromotionId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::sort::SortKey;
use crate::catalog::{Firm, FirmRecord, Promotion};
use crate::locale::Locale;

/// Parameters of one listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Locale for description, rules, and promotion titles.
    pub locale: Locale,
    /// Ordering of the result.
    pub sort: SortKey,
    /// Keep firms offering this account size; also picks the primary account.
    pub account_size: Option<i32>,
    /// Keep firms supporting this platform (exact match).
    pub platform: Option<String>,
    /// Keep firms paying out within this many days.
    pub max_payout_days: Option<i32>,
    /// Keep firms whose current discount is at least this percentage.
    pub min_discount: Option<Decimal>,
    /// Window applied after sorting.
    pub page: PageRequest,
}

/// A firm after promotion evaluation and pricing, before localization.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedFirm {
    /// The loaded rows.
    pub record: FirmRecord,
    /// Currently active promotions, best first.
    pub active_promotions: Vec<Promotion>,
    /// Discount of the selected promotion, zero when none is active.
    pub current_discount: Decimal,
    /// `current_price` for every account, in store order.
    pub current_prices: Vec<Decimal>,
    /// Index of the primary account within `record.accounts`.
    pub primary_account: Option<usize>,
}

impl PricedFirm {
    /// The promotion that sets `current_discount`.
    #[must_use]
    pub fn selected_promotion(&self) -> Option<&Promotion> {
        self.active_promotions.first()
    }

    /// Base price of the primary account.
    #[must_use]
    pub fn primary_base_price(&self) -> Option<Decimal> {
        self.primary_account
            .and_then(|i| self.record.accounts.get(i))
            .map(|a| a.base_price)
    }

    /// Current price of the primary account; `None` means no pricing available.
    #[must_use]
    pub fn final_price(&self) -> Option<Decimal> {
        self.primary_account
            .and_then(|i| self.current_prices.get(i))
            .copied()
    }
}

/// Firm columns with copy resolved for one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct FirmView {
    pub id: FirmId,
    pub slug: String,
    pub name: String,
    pub website_url: String,
    pub logo_url: Option<String>,
    pub country_notes: Option<String>,
    pub payout_split: String,
    pub earliest_payout_days: Option<i32>,
    pub platforms: Vec<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub rating: Option<Decimal>,
    pub referral_link: Option<String>,
    pub coupon_code: Option<String>,
    pub evaluation_steps: i32,
    pub max_daily_loss: Option<String>,
    pub max_total_loss: Option<String>,
    pub profit_target: Option<String>,
    pub min_trading_days: Option<i32>,
    pub consistency_rule: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub activation_fee: Decimal,
    /// Description in the requested locale, English when untranslated.
    pub description: Option<String>,
    /// Rules in the requested locale, English when untranslated.
    pub rules: Option<String>,
    pub featured: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FirmView {
    /// Resolves `firm` for `locale`.
    #[must_use]
    pub fn localize(firm: &Firm, locale: Locale) -> Self {
        Self {
            id: firm.id,
            slug: firm.slug.clone(),
            name: firm.name.clone(),
            website_url: firm.website_url.clone(),
            logo_url: firm.logo_url.clone(),
            country_notes: firm.country_notes.clone(),
            payout_split: firm.payout_split.clone(),
            earliest_payout_days: firm.earliest_payout_days,
            platforms: firm.platforms.clone(),
            rating: firm.rating,
            referral_link: firm.referral_link.clone(),
            coupon_code: firm.coupon_code.clone(),
            evaluation_steps: firm.evaluation_steps,
            max_daily_loss: firm.max_daily_loss.clone(),
            max_total_loss: firm.max_total_loss.clone(),
            profit_target: firm.profit_target.clone(),
            min_trading_days: firm.min_trading_days,
            consistency_rule: firm.consistency_rule.clone(),
            activation_fee: firm.activation_fee,
            description: firm.description.resolve(locale).map(str::to_string),
            rules: firm.rules.resolve(locale).map(str::to_string),
            featured: firm.featured,
            active: firm.active,
            created_at: firm.created_at,
            updated_at: firm.updated_at,
        }
    }
}

/// An account with its discounted price.
///
/// Payout fields are copied from the parent firm at read time rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedAccount {
    /// Account ID.
    pub id: AccountId,
    /// Owning firm.
    pub firm_id: FirmId,
    /// Account size in US dollars.
    pub size_usd: i32,
    /// Undiscounted price.
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    /// Price after the firm's current discount.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,
    /// Currency of both prices.
    pub currency: String,
    /// Parent firm's payout delay.
    pub earliest_payout_days: Option<i32>,
    /// Parent firm's profit split.
    pub payout_split: String,
}

/// A promotion with its title resolved for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionView {
    /// Promotion ID.
    pub id: PromotionId,
    /// Owning firm.
    pub firm_id: FirmId,
    /// Title in the requested locale, English when untranslated.
    pub title: Option<String>,
    /// Discount percentage.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_pct: Decimal,
    /// Window start.
    pub starts_at: Option<DateTime<Utc>>,
    /// Window end.
    pub ends_at: DateTime<Utc>,
    /// Checkout coupon.
    pub coupon_code: Option<String>,
    /// Affiliate link override.
    pub landing_url: Option<String>,
    /// Administrative switch.
    pub active: bool,
    /// Whether the promotion counts right now.
    pub is_current: bool,
}

impl PromotionView {
    /// Resolves `promotion` for `locale`.
    #[must_use]
    pub fn localize(promotion: &Promotion, locale: Locale, is_current: bool) -> Self {
        Self {
            id: promotion.id,
            firm_id: promotion.firm_id,
            title: promotion.title.resolve(locale).map(str::to_string),
            discount_pct: promotion.discount_pct,
            starts_at: promotion.starts_at,
            ends_at: promotion.ends_at,
            coupon_code: promotion.coupon_code.clone(),
            landing_url: promotion.landing_url.clone(),
            active: promotion.active,
            is_current,
        }
    }
}

/// One row of the public listing. `promotions` holds only currently active ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmListItem {
    /// Localized firm columns.
    #[serde(flatten)]
    pub firm: FirmView,
    /// Accounts with current prices.
    pub accounts: Vec<PricedAccount>,
    /// Active promotions, best first.
    pub promotions: Vec<PromotionView>,
    /// Discount applied to every account.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_discount: Decimal,
    /// Current price of the primary account.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub final_price: Option<Decimal>,
    /// End of the selected promotion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown_end_time: Option<DateTime<Utc>>,
    /// Where "visit firm" should link: the promotion landing page or the referral link.
    pub outbound_url: Option<String>,
}

/// The firm detail page. `promotions` holds the full history, flagged with `isCurrent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmDetail {
    /// Localized firm columns.
    #[serde(flatten)]
    pub firm: FirmView,
    /// Accounts with current prices.
    pub accounts: Vec<PricedAccount>,
    /// Every stored promotion, newest window end first.
    pub promotions: Vec<PromotionView>,
    /// Discount applied to every account.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_discount: Decimal,
    /// Current price of the primary account.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub final_price: Option<Decimal>,
    /// End of the selected promotion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown_end_time: Option<DateTime<Utc>>,
    /// Where "visit firm" should link.
    pub outbound_url: Option<String>,
}

/// Minimal firm reference carried by the promotions feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmRef {
    /// Firm ID.
    pub id: FirmId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Logo.
    pub logo_url: Option<String>,
    /// Firm referral link.
    pub referral_link: Option<String>,
}

/// A currently active promotion with the firm that runs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePromotion {
    /// The promotion.
    #[serde(flatten)]
    pub promotion: PromotionView,
    /// The firm.
    pub firm: FirmRef,
}
