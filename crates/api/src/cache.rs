//! Catalog row caching using Moka.
//!
//! Caches the stored firm records behind the public read endpoints. Promotion windows
//! and prices are not cached; they are evaluated against the clock on every request.

use moka::future::Cache;
use propfirm_core::catalog::FirmRecord;
use propfirm_db::FirmRepository;
use propfirm_shared::CacheConfig;
use sea_orm::DbErr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cache of active firm records.
///
/// Cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct CatalogCache {
    listing: Cache<(), Arc<Vec<FirmRecord>>>,
    details: Cache<String, Option<Arc<FirmRecord>>>,
}

impl CatalogCache {
    /// Creates a cache sized and timed by `config`.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.listing_ttl_secs);
        Self {
            listing: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            details: Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Every active firm record, loaded through `repo` on a miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails. Failures are not cached.
    pub async fn active_records(
        &self,
        repo: &FirmRepository,
    ) -> Result<Arc<Vec<FirmRecord>>, DbErr> {
        if let Some(records) = self.listing.get(&()).await {
            return Ok(records);
        }

        let records = Arc::new(repo.list_active_records().await?);
        debug!(count = records.len(), "Cached active firm records");
        self.listing.insert((), Arc::clone(&records)).await;
        Ok(records)
    }

    /// The active firm record for `slug`, loaded through `repo` on a miss.
    ///
    /// Misses are cached too, so unknown slugs do not reach the store on every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn active_record(
        &self,
        repo: &FirmRepository,
        slug: &str,
    ) -> Result<Option<Arc<FirmRecord>>, DbErr> {
        if let Some(record) = self.details.get(slug).await {
            return Ok(record);
        }

        let record = repo.find_active_record_by_slug(slug).await?.map(Arc::new);
        self.details.insert(slug.to_string(), record.clone()).await;
        Ok(record)
    }

    /// Drops every entry. Called after any catalog write.
    pub fn invalidate(&self) {
        self.listing.invalidate_all();
        self.details.invalidate_all();
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
