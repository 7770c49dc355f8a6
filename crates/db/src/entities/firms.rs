//! `SeaORM` Entity for firms table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "firms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub website_url: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub logo_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub country_notes: Option<String>,
    pub payout_split: String,
    pub earliest_payout_days: Option<i32>,
    #[sea_orm(column_type = "JsonBinary")]
    pub platforms: Json,
    #[sea_orm(column_type = "Decimal(Some((3, 2)))", nullable)]
    pub rating: Option<Decimal>,
    #[sea_orm(column_type = "Text", nullable)]
    pub referral_link: Option<String>,
    pub coupon_code: Option<String>,
    pub evaluation_steps: i32,
    pub max_daily_loss: Option<String>,
    pub max_total_loss: Option<String>,
    pub profit_target: Option<String>,
    pub min_trading_days: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub consistency_rule: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub activation_fee: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_ko: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_ja: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_hi: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rules: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rules_ko: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rules_ja: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rules_hi: Option<String>,
    pub featured: bool,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
    #[sea_orm(has_many = "super::promotions::Entity")]
    Promotions,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::promotions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Promotions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
