//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - Public listing, detail, promotions, and page metadata routes
//! - Admin CRUD routes behind a bearer token
//! - HMAC-signed bulk sync routes
//! - A row cache for public reads

pub mod cache;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::Router;
use propfirm_shared::{AdminConfig, AppConfig, SyncConfig};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use cache::CatalogCache;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Admin token settings.
    pub admin: Arc<AdminConfig>,
    /// Sync signature settings.
    pub sync: Arc<SyncConfig>,
    /// Cached catalog rows for public reads.
    pub cache: CatalogCache,
}

impl AppState {
    /// Builds state from a connection and loaded configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            admin: Arc::new(config.admin.clone()),
            sync: Arc::new(config.sync.clone()),
            cache: CatalogCache::new(&config.cache),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
