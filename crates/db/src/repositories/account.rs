//! Account repository for a firm's challenge sizes.

use propfirm_core::catalog::{Account, AccountInput, ValidationFailure, validate_input};
use propfirm_shared::types::{AccountId, FirmId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{accounts, firms};
use crate::mapping::write_account;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Owning firm not found.
    #[error("Firm not found: {0}")]
    FirmNotFound(FirmId),

    /// The firm already offers this size.
    #[error("Firm already has a {0} USD account")]
    DuplicateSize(i32),

    /// Payload failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Account repository for admin CRUD.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, DbErr> {
        Ok(accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    /// Lists a firm's accounts, smallest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_firm(&self, firm_id: FirmId) -> Result<Vec<Account>, DbErr> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::FirmId.eq(firm_id.into_inner()))
            .order_by_asc(accounts::Column::SizeUsd)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns `Validation`, `FirmNotFound`, or `DuplicateSize`.
    pub async fn create(&self, input: AccountInput) -> Result<Account, AccountError> {
        let account = insert_account(&self.db, input).await?;
        info!(account_id = %account.id, firm_id = %account.firm_id, size_usd = account.size_usd, "Account created");
        Ok(account)
    }

    /// Replaces every column of an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Validation`, `FirmNotFound`, or `DuplicateSize`.
    pub async fn update(&self, id: AccountId, input: AccountInput) -> Result<Account, AccountError> {
        let existing = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let account = update_account(&self.db, existing, input).await?;
        info!(account_id = %account.id, firm_id = %account.firm_id, "Account updated");
        Ok(account)
    }

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn delete(&self, id: AccountId) -> Result<(), AccountError> {
        let result = accounts::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AccountError::NotFound(id));
        }

        info!(account_id = %id, "Account deleted");
        Ok(())
    }
}

async fn ensure_firm<C: ConnectionTrait>(conn: &C, firm_id: FirmId) -> Result<(), AccountError> {
    let count = firms::Entity::find_by_id(firm_id.into_inner())
        .count(conn)
        .await?;
    if count == 0 {
        return Err(AccountError::FirmNotFound(firm_id));
    }
    Ok(())
}

async fn size_taken<C: ConnectionTrait>(
    conn: &C,
    firm_id: FirmId,
    size_usd: i32,
    except: Option<Uuid>,
) -> Result<bool, DbErr> {
    let mut query = accounts::Entity::find()
        .filter(accounts::Column::FirmId.eq(firm_id.into_inner()))
        .filter(accounts::Column::SizeUsd.eq(size_usd));
    if let Some(id) = except {
        query = query.filter(accounts::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

/// Validates and inserts an account on `conn`.
pub(crate) async fn insert_account<C: ConnectionTrait>(
    conn: &C,
    input: AccountInput,
) -> Result<Account, AccountError> {
    validate_input(&input)?;
    ensure_firm(conn, input.firm_id).await?;
    if size_taken(conn, input.firm_id, input.size_usd, None).await? {
        return Err(AccountError::DuplicateSize(input.size_usd));
    }

    let mut model = accounts::ActiveModel {
        id: Set(Uuid::now_v7()),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };
    write_account(&mut model, input);

    Ok(model.insert(conn).await?.into())
}

/// Validates `input` and writes it over `existing` on `conn`.
pub(crate) async fn update_account<C: ConnectionTrait>(
    conn: &C,
    existing: accounts::Model,
    input: AccountInput,
) -> Result<Account, AccountError> {
    validate_input(&input)?;
    ensure_firm(conn, input.firm_id).await?;
    if size_taken(conn, input.firm_id, input.size_usd, Some(existing.id)).await? {
        return Err(AccountError::DuplicateSize(input.size_usd));
    }

    let mut model: accounts::ActiveModel = existing.into();
    write_account(&mut model, input);

    Ok(model.update(conn).await?.into())
}
