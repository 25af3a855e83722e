// ABOUTME: HTTP surface for the harvest extractor: JSON scrape, batch and CSV export endpoints.
// ABOUTME: build_router wires routes, tracing and CORS layers around a shared AppState.

//! Application setup and server configuration.

pub mod config;
pub mod error;
pub mod requests;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use digests_harvest::Client;

pub use crate::config::Config;
pub use crate::error::{ApiError, ApiResult};
pub use crate::state::AppState;

use crate::routes::{
    export_csv_handler, health_handler, scrape_handler, scrape_multiple_handler, serve_index,
};

/// Build the Axum application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/health", get(health_handler))
        .route("/api/scrape", post(scrape_handler))
        .route("/api/scrape-multiple", post(scrape_multiple_handler))
        .route("/api/export-csv", post(export_csv_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build the router from configuration, constructing the shared scrape client once.
pub fn build_app(config: &Config) -> anyhow::Result<Router> {
    let client = Client::builder().timeout(config.scrape_timeout).build()?;
    Ok(build_router(AppState::new(client, config.static_dir.clone())))
}
