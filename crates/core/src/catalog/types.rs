//! Catalog records as loaded from the entity store.

use chrono::{DateTime, Utc};
use propfirm_shared::types::{AccountId, FirmId, PromotionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::locale::LocalizedText;

/// A proprietary-trading firm being compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firm {
    /// Firm ID.
    pub id: FirmId,
    /// Unique URL slug, also the natural key for bulk sync.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Public website.
    pub website_url: String,
    /// Optional logo.
    pub logo_url: Option<String>,
    /// Country restrictions and notes.
    pub country_notes: Option<String>,
    /// Profit split as free text, e.g. "80/20".
    pub payout_split: String,
    /// Days until the first payout can be requested.
    pub earliest_payout_days: Option<i32>,
    /// Supported trading platforms in display order.
    pub platforms: Vec<String>,
    /// Editorial rating from 0 to 5.
    pub rating: Option<Decimal>,
    /// Outbound affiliate link.
    pub referral_link: Option<String>,
    /// Standing coupon code.
    pub coupon_code: Option<String>,
    /// Number of evaluation phases.
    pub evaluation_steps: i32,
    /// Daily loss limit as free text.
    pub max_daily_loss: Option<String>,
    /// Overall loss limit as free text.
    pub max_total_loss: Option<String>,
    /// Profit target as free text ("10%" or "$5,000").
    pub profit_target: Option<String>,
    /// Minimum number of trading days.
    pub min_trading_days: Option<i32>,
    /// Consistency rule, if the firm has one.
    pub consistency_rule: Option<String>,
    /// One-off fee charged after passing the evaluation.
    pub activation_fee: Decimal,
    /// Marketing description.
    pub description: LocalizedText,
    /// Trading rules summary.
    pub rules: LocalizedText,
    /// Highlighted in the UI. Never a sort key.
    pub featured: bool,
    /// Soft-delete flag; inactive firms never appear in public listings.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// One challenge size a firm sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning firm.
    pub firm_id: FirmId,
    /// Account size in US dollars.
    pub size_usd: i32,
    /// Undiscounted price.
    pub base_price: Decimal,
    /// Currency of `base_price`.
    pub currency: String,
}

/// A time-boxed discount offered by one firm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Promotion ID.
    pub id: PromotionId,
    /// Owning firm.
    pub firm_id: FirmId,
    /// Headline.
    pub title: LocalizedText,
    /// Discount percentage, 0 to 100 inclusive.
    pub discount_pct: Decimal,
    /// Window start; `None` means already started.
    pub starts_at: Option<DateTime<Utc>>,
    /// Window end, inclusive.
    pub ends_at: DateTime<Utc>,
    /// Coupon to apply at checkout.
    pub coupon_code: Option<String>,
    /// Overrides the firm's referral link while the promotion runs.
    pub landing_url: Option<String>,
    /// Administrative on/off switch, independent of the window.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A firm joined with all of its accounts and promotions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmRecord {
    /// The firm row.
    #[serde(flatten)]
    pub firm: Firm,
    /// Accounts in store order (smallest size first).
    pub accounts: Vec<Account>,
    /// Every promotion row, active or not.
    pub promotions: Vec<Promotion>,
}
