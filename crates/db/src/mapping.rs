//! Conversions between database rows and catalog records.

use chrono::{DateTime, Utc};
use propfirm_core::catalog::{
    Account, AccountInput, Firm, FirmInput, FirmRecord, Promotion, PromotionInput,
};
use propfirm_core::locale::LocalizedText;
use propfirm_shared::types::{AccountId, FirmId, PromotionId};
use sea_orm::Set;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value;

use crate::entities::{accounts, firms, promotions};

fn utc(at: DateTimeWithTimeZone) -> DateTime<Utc> {
    at.with_timezone(&Utc)
}

fn platforms_from_json(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl From<firms::Model> for Firm {
    fn from(model: firms::Model) -> Self {
        Self {
            id: FirmId::from_uuid(model.id),
            platforms: platforms_from_json(&model.platforms),
            slug: model.slug,
            name: model.name,
            website_url: model.website_url,
            logo_url: model.logo_url,
            country_notes: model.country_notes,
            payout_split: model.payout_split,
            earliest_payout_days: model.earliest_payout_days,
            rating: model.rating,
            referral_link: model.referral_link,
            coupon_code: model.coupon_code,
            evaluation_steps: model.evaluation_steps,
            max_daily_loss: model.max_daily_loss,
            max_total_loss: model.max_total_loss,
            profit_target: model.profit_target,
            min_trading_days: model.min_trading_days,
            consistency_rule: model.consistency_rule,
            activation_fee: model.activation_fee,
            description: LocalizedText {
                en: model.description,
                ko: model.description_ko,
                ja: model.description_ja,
                hi: model.description_hi,
            },
            rules: LocalizedText {
                en: model.rules,
                ko: model.rules_ko,
                ja: model.rules_ja,
                hi: model.rules_hi,
            },
            featured: model.featured,
            active: model.active,
            created_at: utc(model.created_at),
            updated_at: utc(model.updated_at),
        }
    }
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: AccountId::from_uuid(model.id),
            firm_id: FirmId::from_uuid(model.firm_id),
            size_usd: model.size_usd,
            base_price: model.base_price,
            currency: model.currency,
        }
    }
}

impl From<promotions::Model> for Promotion {
    fn from(model: promotions::Model) -> Self {
        Self {
            id: PromotionId::from_uuid(model.id),
            firm_id: FirmId::from_uuid(model.firm_id),
            title: LocalizedText {
                en: Some(model.title),
                ko: model.title_ko,
                ja: model.title_ja,
                hi: model.title_hi,
            },
            discount_pct: model.discount_pct,
            starts_at: model.starts_at.map(utc),
            ends_at: utc(model.ends_at),
            coupon_code: model.coupon_code,
            landing_url: model.landing_url,
            active: model.active,
            created_at: utc(model.created_at),
        }
    }
}

/// Assembles a record from a firm row and its (already ordered) children.
pub(crate) fn record(
    firm: firms::Model,
    accounts: Vec<accounts::Model>,
    promotions: Vec<promotions::Model>,
) -> FirmRecord {
    FirmRecord {
        firm: firm.into(),
        accounts: accounts.into_iter().map(Into::into).collect(),
        promotions: promotions.into_iter().map(Into::into).collect(),
    }
}

/// Writes every column of `input` onto `model`.
pub(crate) fn write_firm(model: &mut firms::ActiveModel, input: FirmInput) {
    model.slug = Set(input.slug);
    model.name = Set(input.name);
    model.website_url = Set(input.website_url);
    model.logo_url = Set(input.logo_url);
    model.country_notes = Set(input.country_notes);
    model.payout_split = Set(input.payout_split);
    model.earliest_payout_days = Set(input.earliest_payout_days);
    model.platforms = Set(Value::from(input.platforms));
    model.rating = Set(input.rating);
    model.referral_link = Set(input.referral_link);
    model.coupon_code = Set(input.coupon_code);
    model.evaluation_steps = Set(input.evaluation_steps);
    model.max_daily_loss = Set(input.max_daily_loss);
    model.max_total_loss = Set(input.max_total_loss);
    model.profit_target = Set(input.profit_target);
    model.min_trading_days = Set(input.min_trading_days);
    model.consistency_rule = Set(input.consistency_rule);
    model.activation_fee = Set(input.activation_fee);
    model.description = Set(input.description.en);
    model.description_ko = Set(input.description.ko);
    model.description_ja = Set(input.description.ja);
    model.description_hi = Set(input.description.hi);
    model.rules = Set(input.rules.en);
    model.rules_ko = Set(input.rules.ko);
    model.rules_ja = Set(input.rules.ja);
    model.rules_hi = Set(input.rules.hi);
    model.featured = Set(input.featured);
    model.active = Set(input.active);
    model.updated_at = Set(Utc::now().into());
}

/// Writes every column of `input` onto `model`.
pub(crate) fn write_account(model: &mut accounts::ActiveModel, input: AccountInput) {
    model.firm_id = Set(input.firm_id.into_inner());
    model.size_usd = Set(input.size_usd);
    model.base_price = Set(input.base_price);
    model.currency = Set(input.currency.to_uppercase());
    model.updated_at = Set(Utc::now().into());
}

/// Writes every column of `input` onto `model`.
///
/// The English title is required by validation; an empty string is stored if a caller
/// skipped it.
pub(crate) fn write_promotion(model: &mut promotions::ActiveModel, input: PromotionInput) {
    model.firm_id = Set(input.firm_id.into_inner());
    model.title = Set(input.title.en.unwrap_or_default());
    model.title_ko = Set(input.title.ko);
    model.title_ja = Set(input.title.ja);
    model.title_hi = Set(input.title.hi);
    model.discount_pct = Set(input.discount_pct);
    model.starts_at = Set(input.starts_at.map(Into::into));
    model.ends_at = Set(input.ends_at.into());
    model.coupon_code = Set(input.coupon_code);
    model.landing_url = Set(input.landing_url);
    model.active = Set(input.active);
    model.updated_at = Set(Utc::now().into());
}
