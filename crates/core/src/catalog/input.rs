//! Write inputs for admin CRUD and bulk sync.
//!
//! Admin `POST`/`PUT` bodies deserialize into the full `*Input` types, which replace
//! every column. Bulk sync items deserialize into `*Patch` types where every field
//! except the natural key is optional; a patch is overlaid on the stored row (or must
//! be complete when no row exists yet) and the merged input is validated as usual.

use chrono::{DateTime, Utc};
use propfirm_shared::types::FirmId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::types::{Account, Firm, Promotion};
use super::validation::{
    ValidationFailure, error, validate_non_negative, validate_percentage, validate_slug,
};
use crate::locale::LocalizedText;

/// Full firm payload for create and replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_firm_rating", skip_on_field_errors = false))]
pub struct FirmInput {
    /// Unique URL slug.
    #[validate(length(min = 1, max = 100), custom(function = "validate_slug"))]
    pub slug: String,
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Public website.
    #[validate(url)]
    pub website_url: String,
    /// Optional logo.
    #[validate(url)]
    pub logo_url: Option<String>,
    /// Country restrictions and notes.
    pub country_notes: Option<String>,
    /// Profit split, e.g. "80/20".
    #[validate(length(min = 1, max = 50))]
    pub payout_split: String,
    /// Days until the first payout.
    #[validate(range(min = 0))]
    pub earliest_payout_days: Option<i32>,
    /// Supported platforms.
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Rating from 0 to 5.
    pub rating: Option<Decimal>,
    /// Outbound affiliate link.
    #[validate(url)]
    pub referral_link: Option<String>,
    /// Standing coupon code.
    pub coupon_code: Option<String>,
    /// Number of evaluation phases.
    #[serde(default = "default_evaluation_steps")]
    #[validate(range(min = 1))]
    pub evaluation_steps: i32,
    /// Daily loss limit.
    pub max_daily_loss: Option<String>,
    /// Overall loss limit.
    pub max_total_loss: Option<String>,
    /// Profit target.
    pub profit_target: Option<String>,
    /// Minimum trading days.
    #[validate(range(min = 0))]
    pub min_trading_days: Option<i32>,
    /// Consistency rule.
    pub consistency_rule: Option<String>,
    /// Activation fee.
    #[serde(default)]
    #[validate(custom(function = "validate_non_negative"))]
    pub activation_fee: Decimal,
    /// Marketing description per locale.
    #[serde(default)]
    pub description: LocalizedText,
    /// Rules summary per locale.
    #[serde(default)]
    pub rules: LocalizedText,
    /// Highlighted in the UI.
    #[serde(default)]
    pub featured: bool,
    /// Listed publicly.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_evaluation_steps() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "USD".to_string()
}

fn validate_firm_rating(input: &FirmInput) -> Result<(), ValidationError> {
    if let Some(rating) = input.rating
        && (rating < Decimal::ZERO || rating > Decimal::from(5))
    {
        return Err(error("rating", "must be between 0 and 5"));
    }
    Ok(())
}

impl FirmInput {
    /// Rebuilds the input that would reproduce `firm`.
    #[must_use]
    pub fn from_firm(firm: &Firm) -> Self {
        Self {
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
            description: firm.description.clone(),
            rules: firm.rules.clone(),
            featured: firm.featured,
            active: firm.active,
        }
    }
}

/// Full account payload for create and replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    /// Owning firm.
    pub firm_id: FirmId,
    /// Account size in US dollars.
    #[validate(range(min = 1))]
    pub size_usd: i32,
    /// Undiscounted price.
    #[validate(custom(function = "validate_non_negative"))]
    pub base_price: Decimal,
    /// ISO 4217 currency code.
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3))]
    pub currency: String,
}

/// Full promotion payload for create and replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_promotion_window", skip_on_field_errors = false))]
pub struct PromotionInput {
    /// Owning firm.
    pub firm_id: FirmId,
    /// Headline per locale; English is required.
    pub title: LocalizedText,
    /// Discount percentage.
    #[validate(custom(function = "validate_percentage"))]
    pub discount_pct: Decimal,
    /// Window start; absent means already started.
    pub starts_at: Option<DateTime<Utc>>,
    /// Window end.
    pub ends_at: DateTime<Utc>,
    /// Checkout coupon.
    pub coupon_code: Option<String>,
    /// Affiliate link override.
    #[validate(url)]
    pub landing_url: Option<String>,
    /// Administrative on/off switch.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn validate_promotion_window(input: &PromotionInput) -> Result<(), ValidationError> {
    if input.title.en.as_deref().is_none_or(|t| t.trim().is_empty()) {
        return Err(error("title", "English title is required"));
    }
    if let Some(starts_at) = input.starts_at
        && input.ends_at <= starts_at
    {
        return Err(error("endsAt", "must be after startsAt"));
    }
    Ok(())
}

/// Partial firm from a bulk sync body, keyed by `slug`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct FirmPatch {
    pub slug: String,
    pub name: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub country_notes: Option<String>,
    pub payout_split: Option<String>,
    pub earliest_payout_days: Option<i32>,
    pub platforms: Option<Vec<String>>,
    pub rating: Option<Decimal>,
    pub referral_link: Option<String>,
    pub coupon_code: Option<String>,
    pub evaluation_steps: Option<i32>,
    pub max_daily_loss: Option<String>,
    pub max_total_loss: Option<String>,
    pub profit_target: Option<String>,
    pub min_trading_days: Option<i32>,
    pub consistency_rule: Option<String>,
    pub activation_fee: Option<Decimal>,
    pub description: Option<LocalizedText>,
    pub rules: Option<LocalizedText>,
    pub featured: Option<bool>,
    pub active: Option<bool>,
    /// Accounts to upsert by size.
    #[serde(default)]
    pub accounts: Vec<AccountPatch>,
}

/// Account nested in a firm sync item, keyed by `sizeUsd` within its firm.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    /// Account size in US dollars.
    pub size_usd: i32,
    /// Undiscounted price.
    pub base_price: Decimal,
    /// Currency, `USD` when absent.
    pub currency: Option<String>,
}

impl AccountPatch {
    /// Turns the patch into a full input for `firm_id`.
    #[must_use]
    pub fn into_input(self, firm_id: FirmId) -> AccountInput {
        AccountInput {
            firm_id,
            size_usd: self.size_usd,
            base_price: self.base_price,
            currency: self.currency.unwrap_or_else(default_currency),
        }
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationFailure> {
    value.ok_or_else(|| ValidationFailure::single(field, "is required"))
}

impl FirmPatch {
    /// Builds the input for a firm that does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a failure naming the first missing required field.
    pub fn into_new_input(self) -> Result<FirmInput, ValidationFailure> {
        Ok(FirmInput {
            name: required(self.name, "name")?,
            website_url: required(self.website_url, "websiteUrl")?,
            payout_split: required(self.payout_split, "payoutSplit")?,
            slug: self.slug,
            logo_url: self.logo_url,
            country_notes: self.country_notes,
            earliest_payout_days: self.earliest_payout_days,
            platforms: self.platforms.unwrap_or_default(),
            rating: self.rating,
            referral_link: self.referral_link,
            coupon_code: self.coupon_code,
            evaluation_steps: self.evaluation_steps.unwrap_or_else(default_evaluation_steps),
            max_daily_loss: self.max_daily_loss,
            max_total_loss: self.max_total_loss,
            profit_target: self.profit_target,
            min_trading_days: self.min_trading_days,
            consistency_rule: self.consistency_rule,
            activation_fee: self.activation_fee.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            rules: self.rules.unwrap_or_default(),
            featured: self.featured.unwrap_or(false),
            active: self.active.unwrap_or(true),
        })
    }

    /// Overlays the fields present in this patch on an existing firm.
    #[must_use]
    pub fn apply_to(self, existing: &Firm) -> FirmInput {
        let mut input = FirmInput::from_firm(existing);
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(website_url) = self.website_url {
            input.website_url = website_url;
        }
        if let Some(payout_split) = self.payout_split {
            input.payout_split = payout_split;
        }
        if let Some(platforms) = self.platforms {
            input.platforms = platforms;
        }
        if let Some(evaluation_steps) = self.evaluation_steps {
            input.evaluation_steps = evaluation_steps;
        }
        if let Some(activation_fee) = self.activation_fee {
            input.activation_fee = activation_fee;
        }
        if let Some(description) = self.description {
            input.description = input.description.overlay(description);
        }
        if let Some(rules) = self.rules {
            input.rules = input.rules.overlay(rules);
        }
        if let Some(featured) = self.featured {
            input.featured = featured;
        }
        if let Some(active) = self.active {
            input.active = active;
        }
        input.logo_url = self.logo_url.or(input.logo_url);
        input.country_notes = self.country_notes.or(input.country_notes);
        input.earliest_payout_days = self.earliest_payout_days.or(input.earliest_payout_days);
        input.rating = self.rating.or(input.rating);
        input.referral_link = self.referral_link.or(input.referral_link);
        input.coupon_code = self.coupon_code.or(input.coupon_code);
        input.max_daily_loss = self.max_daily_loss.or(input.max_daily_loss);
        input.max_total_loss = self.max_total_loss.or(input.max_total_loss);
        input.profit_target = self.profit_target.or(input.profit_target);
        input.min_trading_days = self.min_trading_days.or(input.min_trading_days);
        input.consistency_rule = self.consistency_rule.or(input.consistency_rule);
        input
    }
}

/// Partial promotion from a bulk sync body, keyed by `firmSlug` and English title.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct PromotionPatch {
    pub firm_slug: String,
    pub title: LocalizedText,
    pub discount_pct: Option<Decimal>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub coupon_code: Option<String>,
    pub landing_url: Option<String>,
    pub active: Option<bool>,
}

impl PromotionPatch {
    /// Returns the English title used as the natural key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.title.en.as_deref().unwrap_or_default()
    }

    /// Builds the full input, overlaying `existing` when the promotion is already stored.
    ///
    /// # Errors
    ///
    /// Returns a failure when a new promotion lacks `discountPct` or `endsAt`.
    pub fn into_input(
        self,
        firm_id: FirmId,
        existing: Option<&Promotion>,
    ) -> Result<PromotionInput, ValidationFailure> {
        let discount_pct = match (self.discount_pct, existing) {
            (Some(pct), _) => pct,
            (None, Some(p)) => p.discount_pct,
            (None, None) => return Err(ValidationFailure::single("discountPct", "is required")),
        };
        let ends_at = match (self.ends_at, existing) {
            (Some(at), _) => at,
            (None, Some(p)) => p.ends_at,
            (None, None) => return Err(ValidationFailure::single("endsAt", "is required")),
        };

        let title = match existing {
            Some(p) => p.title.overlay(self.title),
            None => self.title,
        };

        Ok(PromotionInput {
            firm_id,
            title,
            discount_pct,
            starts_at: self.starts_at.or(existing.and_then(|p| p.starts_at)),
            ends_at,
            coupon_code: self
                .coupon_code
                .or_else(|| existing.and_then(|p| p.coupon_code.clone())),
            landing_url: self
                .landing_url
                .or_else(|| existing.and_then(|p| p.landing_url.clone())),
            active: self
                .active
                .or(existing.map(|p| p.active))
                .unwrap_or(true),
        })
    }
}

/// Finds the stored account a sync patch should update.
#[must_use]
pub fn matching_account<'a>(accounts: &'a [Account], patch: &AccountPatch) -> Option<&'a Account> {
    accounts.iter().find(|a| a.size_usd == patch.size_usd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::validation::validate_input;
    use chrono::{Duration, TimeZone};
    use propfirm_shared::types::PromotionId;
    use rust_decimal_macros::dec;

    fn firm_input() -> FirmInput {
        serde_json::from_value(serde_json::json!({
            "slug": "ftmo",
            "name": "FTMO",
            "websiteUrl": "https://ftmo.com",
            "payoutSplit": "80/20",
            "earliestPayoutDays": 14,
            "platforms": ["MetaTrader4", "MetaTrader5", "cTrader"],
            "rating": 4.8
        }))
        .unwrap()
    }

    #[test]
    fn test_firm_input_defaults() {
        let input = firm_input();
        assert_eq!(input.evaluation_steps, 1);
        assert!(input.active);
        assert!(!input.featured);
        assert_eq!(input.activation_fee, Decimal::ZERO);
        assert_eq!(input.rating, Some(dec!(4.8)));
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn test_firm_input_collects_every_field_error() {
        let mut input = firm_input();
        input.name = String::new();
        input.website_url = "not a url".into();
        input.rating = Some(dec!(5.5));
        input.evaluation_steps = 0;

        let failure = validate_input(&input).unwrap_err();
        let fields: Vec<_> = failure.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["evaluationSteps", "name", "rating", "websiteUrl"]);
    }

    #[test]
    fn test_account_input_rejects_zero_size() {
        let input = AccountInput {
            firm_id: FirmId::new(),
            size_usd: 0,
            base_price: dec!(549.00),
            currency: "USD".into(),
        };
        let failure = validate_input(&input).unwrap_err();
        assert_eq!(failure.errors[0].field, "sizeUsd");
    }

    #[test]
    fn test_promotion_window_must_be_ordered() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let input = PromotionInput {
            firm_id: FirmId::new(),
            title: LocalizedText::english("Spring sale"),
            discount_pct: dec!(20),
            starts_at: Some(start),
            ends_at: start - Duration::days(1),
            coupon_code: None,
            landing_url: None,
            active: true,
        };
        let failure = validate_input(&input).unwrap_err();
        assert_eq!(failure.errors[0].field, "endsAt");
    }

    #[test]
    fn test_promotion_requires_english_title() {
        let input = PromotionInput {
            firm_id: FirmId::new(),
            title: LocalizedText {
                ko: Some("봄 세일".into()),
                ..LocalizedText::default()
            },
            discount_pct: dec!(10),
            starts_at: None,
            ends_at: Utc::now(),
            coupon_code: None,
            landing_url: None,
            active: true,
        };
        assert_eq!(validate_input(&input).unwrap_err().errors[0].field, "title");
    }

    #[test]
    fn test_new_firm_patch_requires_name() {
        let patch: FirmPatch = serde_json::from_value(serde_json::json!({
            "slug": "b",
            "websiteUrl": "https://b.example",
            "payoutSplit": "90/10"
        }))
        .unwrap();
        let failure = patch.into_new_input().unwrap_err();
        assert_eq!(failure.to_string(), "name: is required");
    }

    #[test]
    fn test_patch_overlays_only_present_fields() {
        let now = Utc::now();
        let existing = Firm {
            id: FirmId::new(),
            slug: "ftmo".into(),
            name: "FTMO".into(),
            website_url: "https://ftmo.com".into(),
            logo_url: Some("https://ftmo.com/logo.png".into()),
            country_notes: None,
            payout_split: "80/20".into(),
            earliest_payout_days: Some(14),
            platforms: vec!["MetaTrader5".into()],
            rating: Some(dec!(4.5)),
            referral_link: None,
            coupon_code: None,
            evaluation_steps: 2,
            max_daily_loss: Some("5%".into()),
            max_total_loss: Some("10%".into()),
            profit_target: Some("10%".into()),
            min_trading_days: Some(4),
            consistency_rule: None,
            activation_fee: Decimal::ZERO,
            description: LocalizedText {
                en: Some("Czech prop firm".into()),
                ko: Some("체코 프롭 회사".into()),
                ..LocalizedText::default()
            },
            rules: LocalizedText::english("No news trading"),
            featured: true,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let patch: FirmPatch = serde_json::from_value(serde_json::json!({
            "slug": "ftmo",
            "payoutSplit": "90/10",
            "rating": 4.9,
            "description": { "en": "Prague-based prop firm" }
        }))
        .unwrap();

        let merged = patch.apply_to(&existing);
        assert_eq!(merged.payout_split, "90/10");
        assert_eq!(merged.rating, Some(dec!(4.9)));
        assert_eq!(merged.name, "FTMO");
        assert_eq!(merged.evaluation_steps, 2);
        assert_eq!(merged.logo_url.as_deref(), Some("https://ftmo.com/logo.png"));
        assert!(merged.featured);
        assert_eq!(merged.description.en.as_deref(), Some("Prague-based prop firm"));
        assert_eq!(merged.description.ko.as_deref(), Some("체코 프롭 회사"));
        assert_eq!(merged.rules.en.as_deref(), Some("No news trading"));
    }

    #[test]
    fn test_promotion_patch_keeps_stored_translations() {
        let firm_id = FirmId::new();
        let ends_at = Utc::now() + Duration::days(3);
        let existing = Promotion {
            id: PromotionId::new(),
            firm_id,
            title: LocalizedText {
                en: Some("Summer".into()),
                ko: Some("여름 세일".into()),
                ..LocalizedText::default()
            },
            discount_pct: dec!(15),
            starts_at: None,
            ends_at,
            coupon_code: Some("SUMMER".into()),
            landing_url: None,
            active: true,
            created_at: Utc::now(),
        };
        let patch: PromotionPatch = serde_json::from_value(serde_json::json!({
            "firmSlug": "ftmo",
            "title": { "en": "Summer" },
            "discountPct": 25
        }))
        .unwrap();

        let input = patch.into_input(firm_id, Some(&existing)).unwrap();
        assert_eq!(input.title.en.as_deref(), Some("Summer"));
        assert_eq!(input.title.ko.as_deref(), Some("여름 세일"));
        assert_eq!(input.discount_pct, dec!(25));
        assert_eq!(input.ends_at, ends_at);
        assert_eq!(input.coupon_code.as_deref(), Some("SUMMER"));
    }

    #[test]
    fn test_new_promotion_patch_requires_end() {
        let patch: PromotionPatch = serde_json::from_value(serde_json::json!({
            "firmSlug": "ftmo",
            "title": { "en": "Summer" },
            "discountPct": 15
        }))
        .unwrap();
        assert_eq!(patch.key(), "Summer");
        let failure = patch.into_input(FirmId::new(), None).unwrap_err();
        assert_eq!(failure.errors[0].field, "endsAt");
    }
}
