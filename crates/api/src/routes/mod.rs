//! API route definitions.

use axum::{Router, middleware};

use crate::{
    AppState,
    middleware::{admin_middleware, signature_middleware},
};

pub mod admin_accounts;
pub mod admin_firms;
pub mod admin_promotions;
pub mod firms;
pub mod health;
pub mod promotions;
pub mod sync;

/// Creates the public read routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(firms::routes())
        .merge(promotions::routes())
}

/// Creates the API router, wiring the admin and sync guards to their routes.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .merge(admin_firms::routes())
        .merge(admin_accounts::routes())
        .merge(admin_promotions::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    let sync_routes = sync::routes().layer(middleware::from_fn_with_state(
        state,
        signature_middleware,
    ));

    Router::new()
        .merge(public_routes())
        .merge(admin_routes)
        .merge(sync_routes)
}
