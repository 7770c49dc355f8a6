//! Database seeder for PropFirmMentor development and testing.
//!
//! Seeds a handful of firms with accounts and running promotions. Items go through the
//! bulk sync upsert, so running the seeder twice updates rows instead of duplicating them.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Duration, Utc};
use propfirm_db::SyncRepository;
use serde_json::{Value, json};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = propfirm_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let sync = SyncRepository::new(db);

    println!("Seeding firms and accounts...");
    let report = sync.sync_firms(firms()).await;
    println!("  {} firms written", report.success);
    for error in &report.errors {
        println!("  {error}");
    }

    println!("Seeding promotions...");
    let report = sync.sync_promotions(promotions()).await;
    println!("  {} promotions written", report.success);
    for error in &report.errors {
        println!("  {error}");
    }

    println!("Seeding complete!");
    Ok(())
}

fn firms() -> Vec<Value> {
    vec![
        json!({
            "slug": "ftmo",
            "name": "FTMO",
            "websiteUrl": "https://ftmo.com",
            "payoutSplit": "80/20",
            "earliestPayoutDays": 14,
            "platforms": ["MetaTrader4", "MetaTrader5", "cTrader", "DXtrade"],
            "rating": 4.8,
            "referralLink": "https://trader.ftmo.com/?affiliates=propfirmmentor",
            "evaluationSteps": 2,
            "maxDailyLoss": "5%",
            "maxTotalLoss": "10%",
            "profitTarget": "10% / 5%",
            "minTradingDays": 4,
            "featured": true,
            "description": {
                "en": "Two-step evaluation with a 14-day payout cycle and a scaling plan.",
                "ko": "14일 지급 주기와 스케일링 플랜을 갖춘 2단계 평가."
            },
            "accounts": [
                { "sizeUsd": 10000, "basePrice": 155 },
                { "sizeUsd": 25000, "basePrice": 250 },
                { "sizeUsd": 50000, "basePrice": 549 },
                { "sizeUsd": 100000, "basePrice": 540, "currency": "EUR" }
            ]
        }),
        json!({
            "slug": "the5ers",
            "name": "The5ers",
            "websiteUrl": "https://the5ers.com",
            "payoutSplit": "80/20",
            "earliestPayoutDays": 14,
            "platforms": ["MetaTrader5"],
            "rating": 4.6,
            "evaluationSteps": 1,
            "maxTotalLoss": "4%",
            "profitTarget": "10%",
            "description": { "en": "Instant funding and one-step programs with low targets." },
            "accounts": [
                { "sizeUsd": 5000, "basePrice": 39 },
                { "sizeUsd": 20000, "basePrice": 95 },
                { "sizeUsd": 100000, "basePrice": 495 }
            ]
        }),
        json!({
            "slug": "fundednext",
            "name": "FundedNext",
            "websiteUrl": "https://fundednext.com",
            "payoutSplit": "90/10",
            "earliestPayoutDays": 5,
            "platforms": ["MetaTrader4", "MetaTrader5", "cTrader"],
            "rating": 4.5,
            "evaluationSteps": 2,
            "maxDailyLoss": "5%",
            "maxTotalLoss": "10%",
            "consistencyRule": "No single day above 40% of profit",
            "description": {
                "en": "Fast payouts with a 15% profit share during the evaluation.",
                "hi": "मूल्यांकन के दौरान 15% लाभ हिस्सेदारी के साथ तेज़ भुगतान।"
            },
            "accounts": [
                { "sizeUsd": 6000, "basePrice": 59.99 },
                { "sizeUsd": 25000, "basePrice": 199.99 },
                { "sizeUsd": 50000, "basePrice": 299.99 }
            ]
        }),
        json!({
            "slug": "apex-trader-funding",
            "name": "Apex Trader Funding",
            "websiteUrl": "https://apextraderfunding.com",
            "payoutSplit": "100/0",
            "earliestPayoutDays": 8,
            "platforms": ["Rithmic", "Tradovate", "NinjaTrader"],
            "rating": 4.2,
            "evaluationSteps": 1,
            "activationFee": 85,
            "minTradingDays": 7,
            "description": { "en": "Futures evaluations with frequent sitewide coupons." },
            "accounts": [
                { "sizeUsd": 25000, "basePrice": 147 },
                { "sizeUsd": 50000, "basePrice": 167 },
                { "sizeUsd": 100000, "basePrice": 207 }
            ]
        }),
    ]
}

fn promotions() -> Vec<Value> {
    let now = Utc::now();
    let days = |n: i64| (now + Duration::days(n)).to_rfc3339();

    vec![
        json!({
            "firmSlug": "ftmo",
            "title": { "en": "Spring Challenge Sale", "ko": "봄 챌린지 세일" },
            "discountPct": 20,
            "endsAt": days(2),
            "couponCode": "SPRING20"
        }),
        json!({
            "firmSlug": "fundednext",
            "title": { "en": "Fast Payout Week" },
            "discountPct": 15,
            "startsAt": days(-1),
            "endsAt": days(6),
            "couponCode": "NEXT15"
        }),
        json!({
            "firmSlug": "apex-trader-funding",
            "title": { "en": "90% Off Evaluations" },
            "discountPct": 90,
            "endsAt": days(1),
            "couponCode": "SAVENOW",
            "landingUrl": "https://apextraderfunding.com/member/signup"
        }),
        json!({
            "firmSlug": "the5ers",
            "title": { "en": "Winter Sale" },
            "discountPct": 25,
            "startsAt": days(-40),
            "endsAt": days(-10)
        }),
        json!({
            "firmSlug": "the5ers",
            "title": { "en": "New Program Launch" },
            "discountPct": 10,
            "startsAt": days(3),
            "endsAt": days(10)
        }),
    ]
}
