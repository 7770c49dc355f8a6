//! PropFirmMentor API Server
//!
//! Serves the public firm listing and the admin and sync endpoints.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use propfirm_api::{AppState, create_router};
use propfirm_db::connect_with_pool;
use propfirm_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "propfirm=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    if config.admin.api_token.is_none() {
        warn!("PROPFIRM__ADMIN__API_TOKEN is not set; admin routes will refuse every request");
    }
    if config.sync.hmac_secret.is_none() {
        warn!("PROPFIRM__SYNC__HMAC_SECRET is not set; sync routes will refuse every request");
    }
    info!(
        ttl_secs = config.cache.listing_ttl_secs,
        max_capacity = config.cache.max_capacity,
        "Catalog cache configured"
    );

    let app = create_router(AppState::new(db, &config));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
