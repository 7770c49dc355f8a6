//! Property-based and scenario tests for the listing pipeline.

use chrono::Duration;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::filter::{FirmFilter, FirmPredicate};
use super::pricing::discounted_price;
use super::promotion::is_currently_active;
use super::service::ListingService;
use super::sort::SortKey;
use super::types::{ListingQuery, PricedFirm};
use crate::locale::{Locale, LocalizedText};
use fixtures::{firm_record, now, priced, promotion};

/// Builders shared by the listing unit tests.
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use propfirm_shared::types::{AccountId, FirmId, PromotionId};
    use rust_decimal::Decimal;

    use crate::catalog::{Account, Firm, FirmRecord, Promotion};
    use crate::listing::pricing::{price_accounts, primary_account_index};
    use crate::listing::types::PricedFirm;
    use crate::locale::LocalizedText;

    /// Fixed reference time.
    pub(crate) fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    /// An active firm on MetaTrader4/MetaTrader5/cTrader paying out after 14 days.
    pub(crate) fn firm_record(name: &str, accounts: &[(i32, Decimal)]) -> FirmRecord {
        let id = FirmId::new();
        let firm = Firm {
            id,
            slug: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            website_url: format!("https://{}.example.com", name.to_lowercase().replace(' ', "")),
            logo_url: None,
            country_notes: None,
            payout_split: "80/20".into(),
            earliest_payout_days: Some(14),
            platforms: vec!["MetaTrader4".into(), "MetaTrader5".into(), "cTrader".into()],
            rating: Some(Decimal::new(45, 1)),
            referral_link: Some(format!("https://ref.example.com/{}", name.to_lowercase())),
            coupon_code: None,
            evaluation_steps: 2,
            max_daily_loss: Some("5%".into()),
            max_total_loss: Some("10%".into()),
            profit_target: Some("10%".into()),
            min_trading_days: Some(4),
            consistency_rule: None,
            activation_fee: Decimal::ZERO,
            description: LocalizedText::english(format!("{name} description")),
            rules: LocalizedText::english(format!("{name} rules")),
            featured: false,
            active: true,
            created_at: now() - Duration::days(365),
            updated_at: now() - Duration::days(1),
        };

        FirmRecord {
            firm,
            accounts: accounts
                .iter()
                .map(|(size_usd, base_price)| Account {
                    id: AccountId::new(),
                    firm_id: id,
                    size_usd: *size_usd,
                    base_price: *base_price,
                    currency: "USD".into(),
                })
                .collect(),
            promotions: Vec::new(),
        }
    }

    /// An active promotion on `record` with the given window.
    pub(crate) fn promotion(
        record: &FirmRecord,
        discount_pct: Decimal,
        starts_at: Option<DateTime<Utc>>,
        ends_at: DateTime<Utc>,
    ) -> Promotion {
        Promotion {
            id: PromotionId::new(),
            firm_id: record.firm.id,
            title: LocalizedText::english(format!("{discount_pct}% off")),
            discount_pct,
            starts_at,
            ends_at,
            coupon_code: None,
            landing_url: None,
            active: true,
            created_at: now() - Duration::days(7),
        }
    }

    /// Prices `record` at a fixed discount without evaluating promotions.
    pub(crate) fn priced(record: FirmRecord, current_discount: Decimal) -> PricedFirm {
        PricedFirm {
            current_prices: price_accounts(&record.accounts, current_discount),
            primary_account: primary_account_index(&record.accounts, None),
            record,
            active_promotions: Vec::new(),
            current_discount,
        }
    }
}

fn names(list: &[PricedFirm]) -> Vec<String> {
    list.iter().map(|f| f.record.firm.name.clone()).collect()
}

const SIZES: [i32; 5] = [10_000, 25_000, 50_000, 100_000, 200_000];
const PLATFORMS: [&str; 4] = ["MetaTrader4", "MetaTrader5", "cTrader", "NinjaTrader"];

prop_compose! {
    fn arb_firms()(
        specs in prop::collection::vec(
            (
                prop::sample::subsequence(SIZES.to_vec(), 0..=SIZES.len()),
                prop::sample::subsequence(PLATFORMS.to_vec(), 0..=PLATFORMS.len()),
                1u32..100_000,
            ),
            0..12,
        )
    ) -> Vec<crate::catalog::FirmRecord> {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (sizes, platforms, cents))| {
                let accounts: Vec<(i32, Decimal)> = sizes
                    .iter()
                    .map(|s| (*s, Decimal::new(i64::from(cents), 2)))
                    .collect();
                let mut record = firm_record(&format!("Firm {i:02}"), &accounts);
                record.firm.platforms = platforms.iter().map(|p| (*p).to_string()).collect();
                record
            })
            .collect()
    }
}

proptest! {
    /// Active exactly on [starts_at, ends_at] while switched on; never when switched off.
    #[test]
    fn test_activeness_is_a_function_of_time(
        start_offset in -1_000i64..1_000,
        length in 0i64..1_000,
        probe in -3_000i64..3_000,
    ) {
        let record = firm_record("FTMO", &[]);
        let starts_at = now() + Duration::minutes(start_offset);
        let ends_at = starts_at + Duration::minutes(length);
        let mut p = promotion(&record, dec!(10), Some(starts_at), ends_at);
        let at = now() + Duration::minutes(probe);

        prop_assert_eq!(is_currently_active(&p, at), starts_at <= at && at <= ends_at);

        p.active = false;
        prop_assert!(!is_currently_active(&p, at));
    }

    /// The current price never increases as the discount grows.
    #[test]
    fn test_price_is_non_increasing_in_discount(
        cents in 0i64..10_000_000,
        a in 0u32..=100,
        b in 0u32..=100,
    ) {
        let base = Decimal::new(cents, 2);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        let cheaper = discounted_price(base, Decimal::from(high));
        let dearer = discounted_price(base, Decimal::from(low));
        prop_assert!(cheaper <= dearer);
        prop_assert!(dearer <= base);
        prop_assert_eq!(discounted_price(base, Decimal::ONE_HUNDRED), Decimal::ZERO);
        prop_assert_eq!(discounted_price(base, Decimal::ZERO), base);
    }

    /// Size + platform keeps exactly the firms meeting both; dropping either never shrinks.
    #[test]
    fn test_filter_conjunction(records in arb_firms()) {
        let firms: Vec<_> = records.into_iter().map(|r| priced(r, Decimal::ZERO)).collect();
        let both = FirmFilter::new()
            .with(FirmPredicate::AccountSize(50_000))
            .with(FirmPredicate::Platform("MetaTrader5".into()));
        let size_only = FirmFilter::new().with(FirmPredicate::AccountSize(50_000));
        let platform_only = FirmFilter::new().with(FirmPredicate::Platform("MetaTrader5".into()));

        let expected: Vec<String> = firms
            .iter()
            .filter(|f| f.record.accounts.iter().any(|a| a.size_usd == 50_000))
            .filter(|f| f.record.firm.platforms.iter().any(|p| p == "MetaTrader5"))
            .map(|f| f.record.firm.name.clone())
            .collect();

        let narrowed = names(&both.apply(firms.clone()));
        prop_assert_eq!(&narrowed, &expected);

        let by_size = names(&size_only.apply(firms.clone()));
        let by_platform = names(&platform_only.apply(firms));
        prop_assert!(narrowed.iter().all(|n| by_size.contains(n)));
        prop_assert!(narrowed.iter().all(|n| by_platform.contains(n)));
    }

    /// `price_asc` orders by primary base price, then name; unpriced firms trail.
    #[test]
    fn test_price_asc_ordering(records in arb_firms()) {
        let query = ListingQuery {
            sort: SortKey::PriceAsc,
            ..ListingQuery::default()
        };
        let listed = ListingService::list_firms(records, &query, now());

        for pair in listed.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let price_a = a.accounts.first().map(|x| x.base_price);
            let price_b = b.accounts.first().map(|x| x.base_price);
            match (price_a, price_b) {
                (Some(pa), Some(pb)) => {
                    prop_assert!(pa <= pb);
                    if pa == pb {
                        prop_assert!(a.firm.name <= b.firm.name);
                    }
                }
                (None, Some(_)) => prop_assert!(false, "unpriced firm before a priced one"),
                (Some(_), None) => {}
                (None, None) => prop_assert!(a.firm.name <= b.firm.name),
            }
        }
    }
}

#[test]
fn test_ftmo_detail_with_running_promotion() {
    let mut record = firm_record("FTMO", &[(50_000, dec!(549.00))]);
    let promo = promotion(&record, dec!(20), None, now() + Duration::days(2));
    let ends_at = promo.ends_at;
    record.promotions.push(promo);

    let detail = ListingService::firm_detail(record, Locale::En, now()).unwrap();

    assert_eq!(detail.current_discount, dec!(20));
    assert_eq!(detail.accounts[0].current_price, dec!(439.20));
    assert_eq!(detail.final_price, Some(dec!(439.20)));
    assert_eq!(detail.countdown_end_time, Some(ends_at));
    assert!(detail.promotions[0].is_current);
}

#[test]
fn test_ftmo_detail_with_expired_promotion() {
    let mut record = firm_record("FTMO", &[(50_000, dec!(549.00))]);
    let promo = promotion(&record, dec!(20), None, now() - Duration::hours(1));
    record.promotions.push(promo);

    let detail = ListingService::firm_detail(record, Locale::En, now()).unwrap();

    assert_eq!(detail.current_discount, Decimal::ZERO);
    assert_eq!(detail.accounts[0].current_price, dec!(549.00));
    assert_eq!(detail.countdown_end_time, None);
    assert_eq!(detail.promotions.len(), 1);
    assert!(!detail.promotions[0].is_current);
}

#[test]
fn test_listing_and_detail_agree_on_price() {
    let mut record = firm_record("FTMO", &[(10_000, dec!(155)), (50_000, dec!(549.00))]);
    let promo = promotion(&record, dec!(15), None, now() + Duration::days(1));
    record.promotions.push(promo);

    let listed = ListingService::list_firms(vec![record.clone()], &ListingQuery::default(), now());
    let detail = ListingService::firm_detail(record, Locale::En, now()).unwrap();

    assert_eq!(listed[0].accounts, detail.accounts);
    assert_eq!(listed[0].final_price, detail.final_price);
}

#[test]
fn test_max_payout_days_scenario() {
    let mut slow = firm_record("Slow Payer", &[(50_000, dec!(300))]);
    slow.firm.earliest_payout_days = Some(14);
    let mut fast = firm_record("Fast Payer", &[(50_000, dec!(300))]);
    fast.firm.earliest_payout_days = Some(5);

    let query = ListingQuery {
        max_payout_days: Some(7),
        ..ListingQuery::default()
    };
    let listed = ListingService::list_firms(vec![slow, fast], &query, now());

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].firm.name, "Fast Payer");
}

#[test]
fn test_inactive_firm_never_listed_or_detailed() {
    let mut record = firm_record("Gone", &[(50_000, dec!(300))]);
    record.firm.active = false;

    assert!(
        ListingService::list_firms(vec![record.clone()], &ListingQuery::default(), now())
            .is_empty()
    );
    assert!(ListingService::firm_detail(record.clone(), Locale::En, now()).is_none());
    assert!(ListingService::active_promotions(&[record], Locale::En, now()).is_empty());
}

#[test]
fn test_account_size_picks_primary_account() {
    let record = firm_record("FTMO", &[(10_000, dec!(155)), (100_000, dec!(540))]);
    let query = ListingQuery {
        account_size: Some(100_000),
        ..ListingQuery::default()
    };

    let listed = ListingService::list_firms(vec![record], &query, now());
    assert_eq!(listed[0].final_price, Some(dec!(540)));
}

#[test]
fn test_firm_without_accounts_has_no_price() {
    let listed = ListingService::list_firms(
        vec![firm_record("Empty", &[])],
        &ListingQuery::default(),
        now(),
    );
    assert_eq!(listed[0].final_price, None);
    assert!(listed[0].accounts.is_empty());
}

#[test]
fn test_listing_holds_only_active_promotions() {
    let mut record = firm_record("FTMO", &[(50_000, dec!(549.00))]);
    let running = promotion(&record, dec!(10), None, now() + Duration::days(3));
    let expired = promotion(&record, dec!(30), None, now() - Duration::days(3));
    let upcoming = promotion(
        &record,
        dec!(40),
        Some(now() + Duration::days(1)),
        now() + Duration::days(5),
    );
    record.promotions = vec![expired, running, upcoming];

    let listed = ListingService::list_firms(vec![record], &ListingQuery::default(), now());
    assert_eq!(listed[0].promotions.len(), 1);
    assert_eq!(listed[0].current_discount, dec!(10));
}

#[test]
fn test_detail_history_newest_end_first() {
    let mut record = firm_record("FTMO", &[(50_000, dec!(549.00))]);
    let old = promotion(&record, dec!(30), None, now() - Duration::days(30));
    let running = promotion(&record, dec!(10), None, now() + Duration::days(3));
    record.promotions = vec![old, running];

    let detail = ListingService::firm_detail(record, Locale::En, now()).unwrap();
    assert_eq!(detail.promotions[0].discount_pct, dec!(10));
    assert_eq!(detail.promotions[1].discount_pct, dec!(30));
}

#[test]
fn test_min_discount_and_pagination() {
    let mut records = Vec::new();
    for (name, discount) in [("Alpha", dec!(5)), ("Bravo", dec!(20)), ("Charlie", dec!(25))] {
        let mut record = firm_record(name, &[(50_000, dec!(100))]);
        let promo = promotion(&record, discount, None, now() + Duration::days(1));
        record.promotions.push(promo);
        records.push(record);
    }

    let query = ListingQuery {
        min_discount: Some(dec!(10)),
        ..ListingQuery::default()
    };
    let listed = ListingService::list_firms(records.clone(), &query, now());
    let names: Vec<_> = listed.iter().map(|f| f.firm.name.as_str()).collect();
    assert_eq!(names, vec!["Charlie", "Bravo"]);

    let query = ListingQuery {
        page: propfirm_shared::types::PageRequest::from_params(Some(1), Some(1)),
        ..ListingQuery::default()
    };
    let listed = ListingService::list_firms(records, &query, now());
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].firm.name, "Bravo");
}

#[test]
fn test_locale_falls_back_to_english() {
    let mut record = firm_record("FTMO", &[(50_000, dec!(549.00))]);
    record.firm.description = LocalizedText {
        en: Some("Prop firm".into()),
        ko: Some("프롭 펌".into()),
        ..LocalizedText::default()
    };

    let korean = ListingService::firm_detail(record.clone(), Locale::Ko, now()).unwrap();
    assert_eq!(korean.firm.description.as_deref(), Some("프롭 펌"));
    let japanese = ListingService::firm_detail(record, Locale::Ja, now()).unwrap();
    assert_eq!(japanese.firm.description.as_deref(), Some("Prop firm"));
}

#[test]
fn test_outbound_url_prefers_landing_page() {
    let mut record = firm_record("FTMO", &[(50_000, dec!(549.00))]);
    let mut promo = promotion(&record, dec!(20), None, now() + Duration::days(2));
    promo.landing_url = Some("https://ftmo.example.com/summer".into());
    record.promotions.push(promo);

    let listed = ListingService::list_firms(vec![record.clone()], &ListingQuery::default(), now());
    assert_eq!(
        listed[0].outbound_url.as_deref(),
        Some("https://ftmo.example.com/summer")
    );

    record.promotions.clear();
    let listed = ListingService::list_firms(vec![record], &ListingQuery::default(), now());
    assert_eq!(
        listed[0].outbound_url.as_deref(),
        Some("https://ref.example.com/ftmo")
    );
}

#[test]
fn test_promotions_feed_ordering() {
    let mut ftmo = firm_record("FTMO", &[(50_000, dec!(549.00))]);
    let soon = promotion(&ftmo, dec!(20), None, now() + Duration::days(1));
    ftmo.promotions.push(soon);
    let mut apex = firm_record("Apex", &[(50_000, dec!(167))]);
    let big = promotion(&apex, dec!(80), None, now() + Duration::days(10));
    let later = promotion(&apex, dec!(20), None, now() + Duration::days(5));
    apex.promotions = vec![later, big];

    let feed = ListingService::active_promotions(&[ftmo, apex], Locale::En, now());
    let summary: Vec<_> = feed
        .iter()
        .map(|p| (p.firm.slug.as_str(), p.promotion.discount_pct))
        .collect();
    assert_eq!(
        summary,
        vec![("apex", dec!(80)), ("ftmo", dec!(20)), ("apex", dec!(20))]
    );
}
