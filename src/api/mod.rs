//! REST API server module
//!
//! Exposes the ingestion trigger plus health and OpenAPI endpoints.

use crate::config::Config;
use crate::db::ArticleStore;
use crate::error::{Error, Result};
use crate::fetch::FetchSource;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// - `GET /news` - Trigger an ingestion run (`q`, `maxResults` query params)
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
pub fn create_router(
    fetcher: Arc<dyn FetchSource>,
    store: Arc<dyn ArticleStore>,
    config: Arc<Config>,
) -> Router {
    let state = AppState::new(fetcher, store, config.clone());

    let router = Router::new()
        .route("/news", get(routes::get_news))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.api.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Start the API server on the configured bind address.
///
/// Binds a TCP listener and serves the router until the server stops.
///
/// # Errors
/// Returns an error if the listener cannot bind or the server fails while
/// running.
pub async fn start_api_server(
    fetcher: Arc<dyn FetchSource>,
    store: Arc<dyn ArticleStore>,
    config: Arc<Config>,
) -> Result<()> {
    let bind_address = config.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(fetcher, store, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(|e| Error::ApiServerError(format!("failed to bind {}: {}", bind_address, e)))?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
