//! Catalog schema: firms, their accounts, and their promotions.
//!
//! Accounts and promotions cascade with their firm. Money columns are `NUMERIC(10,2)`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CATALOG_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS promotions CASCADE;
             DROP TABLE IF EXISTS accounts CASCADE;
             DROP TABLE IF EXISTS firms CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const CATALOG_SQL: &str = r"
CREATE TABLE firms (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    slug VARCHAR(100) NOT NULL,
    name VARCHAR(200) NOT NULL,
    website_url TEXT NOT NULL,
    logo_url TEXT,
    country_notes TEXT,
    payout_split VARCHAR(50) NOT NULL,
    earliest_payout_days INTEGER,
    platforms JSONB NOT NULL DEFAULT '[]'::jsonb,
    rating NUMERIC(3, 2),
    referral_link TEXT,
    coupon_code VARCHAR(100),
    evaluation_steps INTEGER NOT NULL DEFAULT 1,
    max_daily_loss VARCHAR(100),
    max_total_loss VARCHAR(100),
    profit_target VARCHAR(100),
    min_trading_days INTEGER,
    consistency_rule TEXT,
    activation_fee NUMERIC(10, 2) NOT NULL DEFAULT 0,
    description TEXT,
    description_ko TEXT,
    description_ja TEXT,
    description_hi TEXT,
    rules TEXT,
    rules_ko TEXT,
    rules_ja TEXT,
    rules_hi TEXT,
    featured BOOLEAN NOT NULL DEFAULT false,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_firms_slug UNIQUE (slug),
    CONSTRAINT chk_firms_payout_days CHECK (earliest_payout_days IS NULL OR earliest_payout_days >= 0),
    CONSTRAINT chk_firms_rating CHECK (rating IS NULL OR (rating >= 0 AND rating <= 5)),
    CONSTRAINT chk_firms_evaluation_steps CHECK (evaluation_steps >= 1),
    CONSTRAINT chk_firms_min_trading_days CHECK (min_trading_days IS NULL OR min_trading_days >= 0),
    CONSTRAINT chk_firms_activation_fee CHECK (activation_fee >= 0)
);

-- Public listings only ever read active firms
CREATE INDEX idx_firms_active_name ON firms(name) WHERE active;

CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    firm_id UUID NOT NULL REFERENCES firms(id) ON DELETE CASCADE,
    size_usd INTEGER NOT NULL,
    base_price NUMERIC(10, 2) NOT NULL,
    currency VARCHAR(3) NOT NULL DEFAULT 'USD',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_accounts_firm_size UNIQUE (firm_id, size_usd),
    CONSTRAINT chk_accounts_size CHECK (size_usd > 0),
    CONSTRAINT chk_accounts_price CHECK (base_price >= 0)
);

CREATE INDEX idx_accounts_firm ON accounts(firm_id, size_usd);

CREATE TABLE promotions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    firm_id UUID NOT NULL REFERENCES firms(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    title_ko TEXT,
    title_ja TEXT,
    title_hi TEXT,
    discount_pct NUMERIC(5, 2) NOT NULL,
    starts_at TIMESTAMPTZ,
    ends_at TIMESTAMPTZ NOT NULL,
    coupon_code VARCHAR(100),
    landing_url TEXT,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_promotions_discount CHECK (discount_pct >= 0 AND discount_pct <= 100),
    CONSTRAINT chk_promotions_window CHECK (starts_at IS NULL OR ends_at > starts_at)
);

CREATE INDEX idx_promotions_firm ON promotions(firm_id, ends_at DESC);

-- Sync looks promotions up by firm and English title
CREATE INDEX idx_promotions_firm_title ON promotions(firm_id, title);
";
