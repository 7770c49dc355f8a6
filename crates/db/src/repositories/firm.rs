//! Firm repository for catalog database operations.
//!
//! Public reads return whole [`FirmRecord`]s (firm + accounts + promotions) so the
//! listing pipeline never issues per-firm queries.

use std::collections::HashMap;

use propfirm_core::catalog::{Firm, FirmInput, FirmRecord, ValidationFailure, validate_input};
use propfirm_shared::types::FirmId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{accounts, firms, promotions};
use crate::mapping::{record, write_firm};

/// Error types for firm operations.
#[derive(Debug, thiserror::Error)]
pub enum FirmError {
    /// Firm not found.
    #[error("Firm not found: {0}")]
    NotFound(FirmId),

    /// Slug already used by another firm.
    #[error("Slug '{0}' already exists")]
    DuplicateSlug(String),

    /// Payload failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Firm repository for listing reads and admin CRUD.
#[derive(Debug, Clone)]
pub struct FirmRepository {
    db: DatabaseConnection,
}

impl FirmRepository {
    /// Creates a new firm repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every active firm with its accounts (smallest first) and promotions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active_records(&self) -> Result<Vec<FirmRecord>, DbErr> {
        let firms = firms::Entity::find()
            .filter(firms::Column::Active.eq(true))
            .order_by_asc(firms::Column::Name)
            .all(&self.db)
            .await?;

        load_records(&self.db, firms).await
    }

    /// Loads one active firm by slug. Inactive firms are reported as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_record_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<FirmRecord>, DbErr> {
        let firm = firms::Entity::find()
            .filter(firms::Column::Slug.eq(slug))
            .filter(firms::Column::Active.eq(true))
            .one(&self.db)
            .await?;

        match firm {
            Some(firm) => Ok(load_records(&self.db, vec![firm]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Lists every firm, including inactive ones, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<Firm>, DbErr> {
        let firms = firms::Entity::find()
            .order_by_asc(firms::Column::Name)
            .all(&self.db)
            .await?;

        Ok(firms.into_iter().map(Into::into).collect())
    }

    /// Loads one firm by ID regardless of its active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_record(&self, id: FirmId) -> Result<Option<FirmRecord>, DbErr> {
        match firms::Entity::find_by_id(id.into_inner()).one(&self.db).await? {
            Some(firm) => Ok(load_records(&self.db, vec![firm]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Creates a firm.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a bad payload, `DuplicateSlug` when the slug is taken.
    pub async fn create(&self, input: FirmInput) -> Result<Firm, FirmError> {
        let firm = insert_firm(&self.db, input).await?;
        info!(firm_id = %firm.id, slug = %firm.slug, "Firm created");
        Ok(firm)
    }

    /// Replaces every column of a firm.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Validation`, or `DuplicateSlug`.
    pub async fn update(&self, id: FirmId, input: FirmInput) -> Result<Firm, FirmError> {
        let existing = firms::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(FirmError::NotFound(id))?;

        let firm = update_firm(&self.db, existing, input).await?;
        info!(firm_id = %firm.id, slug = %firm.slug, "Firm updated");
        Ok(firm)
    }

    /// Deletes a firm together with its accounts and promotions.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the firm does not exist.
    pub async fn delete(&self, id: FirmId) -> Result<(), FirmError> {
        let txn = self.db.begin().await?;

        let firm = firms::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or(FirmError::NotFound(id))?;

        let accounts = accounts::Entity::delete_many()
            .filter(accounts::Column::FirmId.eq(firm.id))
            .exec(&txn)
            .await?;
        let promotions = promotions::Entity::delete_many()
            .filter(promotions::Column::FirmId.eq(firm.id))
            .exec(&txn)
            .await?;
        firms::Entity::delete_by_id(firm.id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            firm_id = %id,
            slug = %firm.slug,
            accounts = accounts.rows_affected,
            promotions = promotions.rows_affected,
            "Firm deleted"
        );
        Ok(())
    }
}

/// Attaches ordered accounts and promotions to `firms`, preserving firm order.
pub(crate) async fn load_records<C: ConnectionTrait>(
    conn: &C,
    firms: Vec<firms::Model>,
) -> Result<Vec<FirmRecord>, DbErr> {
    if firms.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = firms.iter().map(|f| f.id).collect();

    let mut accounts_by_firm: HashMap<Uuid, Vec<accounts::Model>> = HashMap::new();
    for account in accounts::Entity::find()
        .filter(accounts::Column::FirmId.is_in(ids.clone()))
        .order_by_asc(accounts::Column::SizeUsd)
        .all(conn)
        .await?
    {
        accounts_by_firm
            .entry(account.firm_id)
            .or_default()
            .push(account);
    }

    let mut promotions_by_firm: HashMap<Uuid, Vec<promotions::Model>> = HashMap::new();
    for promotion in promotions::Entity::find()
        .filter(promotions::Column::FirmId.is_in(ids))
        .order_by_asc(promotions::Column::CreatedAt)
        .all(conn)
        .await?
    {
        promotions_by_firm
            .entry(promotion.firm_id)
            .or_default()
            .push(promotion);
    }

    Ok(firms
        .into_iter()
        .map(|firm| {
            let accounts = accounts_by_firm.remove(&firm.id).unwrap_or_default();
            let promotions = promotions_by_firm.remove(&firm.id).unwrap_or_default();
            record(firm, accounts, promotions)
        })
        .collect())
}

async fn slug_taken<C: ConnectionTrait>(
    conn: &C,
    slug: &str,
    except: Option<FirmId>,
) -> Result<bool, DbErr> {
    let mut query = firms::Entity::find().filter(firms::Column::Slug.eq(slug));
    if let Some(id) = except {
        query = query.filter(firms::Column::Id.ne(id.into_inner()));
    }
    Ok(query.count(conn).await? > 0)
}

/// Validates and inserts a firm on `conn`.
pub(crate) async fn insert_firm<C: ConnectionTrait>(
    conn: &C,
    input: FirmInput,
) -> Result<Firm, FirmError> {
    validate_input(&input)?;
    if slug_taken(conn, &input.slug, None).await? {
        return Err(FirmError::DuplicateSlug(input.slug));
    }

    let now = chrono::Utc::now().into();
    let mut model = firms::ActiveModel {
        id: Set(Uuid::now_v7()),
        created_at: Set(now),
        ..Default::default()
    };
    write_firm(&mut model, input);

    Ok(model.insert(conn).await?.into())
}

/// Validates `input` and writes it over `existing` on `conn`.
pub(crate) async fn update_firm<C: ConnectionTrait>(
    conn: &C,
    existing: firms::Model,
    input: FirmInput,
) -> Result<Firm, FirmError> {
    validate_input(&input)?;
    let id = FirmId::from_uuid(existing.id);
    if input.slug != existing.slug && slug_taken(conn, &input.slug, Some(id)).await? {
        return Err(FirmError::DuplicateSlug(input.slug));
    }

    let mut model: firms::ActiveModel = existing.into();
    write_firm(&mut model, input);

    Ok(model.update(conn).await?.into())
}
