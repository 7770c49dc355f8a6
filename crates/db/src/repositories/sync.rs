//! Bulk sync repository.
//!
//! Every item is upserted by natural key inside its own transaction. A failing item is
//! rolled back and reported; the remaining items are still processed.

use propfirm_core::catalog::{
    Account, AccountPatch, FirmPatch, PromotionPatch, ValidationFailure, matching_account,
};
use propfirm_core::sync::{SyncReport, item_label, parse_item};
use propfirm_shared::types::FirmId;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};
use serde_json::Value;
use tracing::{info, warn};

use super::account::{AccountError, insert_account, update_account};
use super::firm::{FirmError, insert_firm, update_firm};
use super::promotion::{PromotionError, insert_promotion, update_promotion};
use crate::entities::{accounts, firms, promotions};

/// Why one sync item was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SyncItemError {
    /// The item does not have the expected shape.
    #[error("{0}")]
    Parse(String),

    /// The merged entity failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// A promotion names a firm slug that does not exist.
    #[error("Firm '{0}' not found")]
    FirmNotFound(String),

    /// A nested account was rejected.
    #[error("account {size_usd}: {source}")]
    Account {
        /// Size of the rejected account.
        size_usd: i32,
        /// Underlying error.
        source: AccountError,
    },

    /// Firm write failed.
    #[error("{0}")]
    Firm(#[from] FirmError),

    /// Promotion write failed.
    #[error("{0}")]
    Promotion(#[from] PromotionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Sync repository for the HMAC-protected bulk endpoints.
#[derive(Debug, Clone)]
pub struct SyncRepository {
    db: DatabaseConnection,
}

impl SyncRepository {
    /// Creates a new sync repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Upserts firms by slug, with their nested accounts by size.
    pub async fn sync_firms(&self, items: Vec<Value>) -> SyncReport {
        let mut report = SyncReport::default();

        for item in items {
            let slug = item_label(&item, &["slug"]);
            match self.sync_firm(item).await {
                Ok(id) => {
                    info!(firm_id = %id, slug = %slug, "Firm synced");
                    report.record_success();
                }
                Err(e) => {
                    warn!(slug = %slug, error = %e, "Firm sync item rejected");
                    report.record_firm_failure(&slug, e);
                }
            }
        }

        report
    }

    /// Upserts promotions by firm slug and English title.
    pub async fn sync_promotions(&self, items: Vec<Value>) -> SyncReport {
        let mut report = SyncReport::default();

        for item in items {
            let title = item_label(&item, &["title", "en"]);
            match self.sync_promotion(item).await {
                Ok(()) => {
                    info!(title = %title, "Promotion synced");
                    report.record_success();
                }
                Err(e) => {
                    warn!(title = %title, error = %e, "Promotion sync item rejected");
                    report.record_promotion_failure(&title, e);
                }
            }
        }

        report
    }

    async fn sync_firm(&self, item: Value) -> Result<FirmId, SyncItemError> {
        let mut patch: FirmPatch = parse_item(item).map_err(SyncItemError::Parse)?;
        let account_patches = std::mem::take(&mut patch.accounts);

        let txn = self.db.begin().await?;

        let existing = firms::Entity::find()
            .filter(firms::Column::Slug.eq(patch.slug.as_str()))
            .one(&txn)
            .await?;

        let firm = match existing {
            Some(model) => {
                let merged = patch.apply_to(&model.clone().into());
                update_firm(&txn, model, merged).await?
            }
            None => insert_firm(&txn, patch.into_new_input()?).await?,
        };

        sync_accounts(&txn, firm.id, account_patches).await?;

        txn.commit().await?;
        Ok(firm.id)
    }

    async fn sync_promotion(&self, item: Value) -> Result<(), SyncItemError> {
        let patch: PromotionPatch = parse_item(item).map_err(SyncItemError::Parse)?;
        if patch.key().trim().is_empty() {
            return Err(ValidationFailure::single("title", "English title is required").into());
        }

        let txn = self.db.begin().await?;

        let firm = firms::Entity::find()
            .filter(firms::Column::Slug.eq(patch.firm_slug.as_str()))
            .one(&txn)
            .await?
            .ok_or_else(|| SyncItemError::FirmNotFound(patch.firm_slug.clone()))?;
        let firm_id = FirmId::from_uuid(firm.id);

        let existing = promotions::Entity::find()
            .filter(promotions::Column::FirmId.eq(firm.id))
            .filter(promotions::Column::Title.eq(patch.key()))
            .one(&txn)
            .await?;

        match existing {
            Some(model) => {
                let input = patch.into_input(firm_id, Some(&model.clone().into()))?;
                update_promotion(&txn, model, input).await?;
            }
            None => {
                let input = patch.into_input(firm_id, None)?;
                insert_promotion(&txn, input).await?;
            }
        }

        txn.commit().await?;
        Ok(())
    }
}

async fn sync_accounts(
    txn: &DatabaseTransaction,
    firm_id: FirmId,
    patches: Vec<AccountPatch>,
) -> Result<(), SyncItemError> {
    if patches.is_empty() {
        return Ok(());
    }

    let stored = accounts::Entity::find()
        .filter(accounts::Column::FirmId.eq(firm_id.into_inner()))
        .all(txn)
        .await?;
    let current: Vec<Account> = stored.iter().cloned().map(Into::into).collect();

    for patch in patches {
        let size_usd = patch.size_usd;
        let existing = matching_account(&current, &patch)
            .and_then(|a| stored.iter().find(|m| m.id == a.id.into_inner()))
            .cloned();
        let input = patch.into_input(firm_id);

        let result = match existing {
            Some(model) => update_account(txn, model, input).await,
            None => insert_account(txn, input).await,
        };
        result.map_err(|source| SyncItemError::Account { size_usd, source })?;
    }

    Ok(())
}
