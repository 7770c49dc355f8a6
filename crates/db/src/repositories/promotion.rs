//! Promotion repository.

use propfirm_core::catalog::{Promotion, PromotionInput, ValidationFailure, validate_input};
use propfirm_shared::types::{FirmId, PromotionId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{firms, promotions};
use crate::mapping::write_promotion;

/// Error types for promotion operations.
#[derive(Debug, thiserror::Error)]
pub enum PromotionError {
    /// Promotion not found.
    #[error("Promotion not found: {0}")]
    NotFound(PromotionId),

    /// Owning firm not found.
    #[error("Firm not found: {0}")]
    FirmNotFound(FirmId),

    /// Payload failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Promotion repository for admin CRUD.
#[derive(Debug, Clone)]
pub struct PromotionRepository {
    db: DatabaseConnection,
}

impl PromotionRepository {
    /// Creates a new promotion repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a promotion by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: PromotionId) -> Result<Option<Promotion>, DbErr> {
        Ok(promotions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    /// Lists a firm's promotions, latest window end first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_firm(&self, firm_id: FirmId) -> Result<Vec<Promotion>, DbErr> {
        Ok(promotions::Entity::find()
            .filter(promotions::Column::FirmId.eq(firm_id.into_inner()))
            .order_by_desc(promotions::Column::EndsAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Creates a promotion.
    ///
    /// # Errors
    ///
    /// Returns `Validation` or `FirmNotFound`.
    pub async fn create(&self, input: PromotionInput) -> Result<Promotion, PromotionError> {
        let promotion = insert_promotion(&self.db, input).await?;
        info!(
            promotion_id = %promotion.id,
            firm_id = %promotion.firm_id,
            discount_pct = %promotion.discount_pct,
            "Promotion created"
        );
        Ok(promotion)
    }

    /// Replaces every column of a promotion.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Validation`, or `FirmNotFound`.
    pub async fn update(
        &self,
        id: PromotionId,
        input: PromotionInput,
    ) -> Result<Promotion, PromotionError> {
        let existing = promotions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(PromotionError::NotFound(id))?;

        let promotion = update_promotion(&self.db, existing, input).await?;
        info!(promotion_id = %promotion.id, firm_id = %promotion.firm_id, "Promotion updated");
        Ok(promotion)
    }

    /// Deletes a promotion.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the promotion does not exist.
    pub async fn delete(&self, id: PromotionId) -> Result<(), PromotionError> {
        let result = promotions::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(PromotionError::NotFound(id));
        }

        info!(promotion_id = %id, "Promotion deleted");
        Ok(())
    }
}

async fn ensure_firm<C: ConnectionTrait>(conn: &C, firm_id: FirmId) -> Result<(), PromotionError> {
    let count = firms::Entity::find_by_id(firm_id.into_inner())
        .count(conn)
        .await?;
    if count == 0 {
        return Err(PromotionError::FirmNotFound(firm_id));
    }
    Ok(())
}

/// Validates and inserts a promotion on `conn`.
pub(crate) async fn insert_promotion<C: ConnectionTrait>(
    conn: &C,
    input: PromotionInput,
) -> Result<Promotion, PromotionError> {
    validate_input(&input)?;
    ensure_firm(conn, input.firm_id).await?;

    let mut model = promotions::ActiveModel {
        id: Set(Uuid::now_v7()),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };
    write_promotion(&mut model, input);

    Ok(model.insert(conn).await?.into())
}

/// Validates `input` and writes it over `existing` on `conn`.
pub(crate) async fn update_promotion<C: ConnectionTrait>(
    conn: &C,
    existing: promotions::Model,
    input: PromotionInput,
) -> Result<Promotion, PromotionError> {
    validate_input(&input)?;
    ensure_firm(conn, input.firm_id).await?;

    let mut model: promotions::ActiveModel = existing.into();
    write_promotion(&mut model, input);

    Ok(model.update(conn).await?.into())
}
