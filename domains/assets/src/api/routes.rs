//! Route definitions for the Assets domain API

use axum::{
    routing::{post, put},
    Router,
};

use super::handlers::assets;
use super::middleware::AssetsState;

/// Create asset slot routes
fn asset_routes() -> Router<AssetsState> {
    Router::new()
        .route(
            "/v1/entities/{kind}/{id}/asset",
            put(assets::upload_asset).delete(assets::remove_asset),
        )
        .route("/v1/entities/{kind}/purge", post(assets::purge_entities))
}

/// Create all routes for the Assets domain
pub fn routes() -> Router<AssetsState> {
    asset_routes()
}
