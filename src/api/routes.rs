//! Route handlers: the ingestion trigger plus system endpoints.

use crate::api::response::{NewsErrorResponse, NewsResponse};
use crate::api::AppState;
use crate::driver::IngestDriver;
use crate::error::ToHttpStatus;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

/// Query parameters for the ingestion trigger
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NewsParams {
    /// Search query; the configured default when absent
    pub q: Option<String>,

    /// Cap on articles saved this run; the configured default when absent
    pub max_results: Option<u64>,
}

/// GET /news - Trigger an ingestion run
///
/// Runs the full fetch/persist loop synchronously and reports what was
/// saved. A degraded run (retries exhausted mid-way) still answers 200
/// with the partial results.
#[utoipa::path(
    get,
    path = "/news",
    tag = "news",
    params(NewsParams),
    responses(
        (status = 200, description = "Ingestion run completed", body = NewsResponse),
        (status = 500, description = "Ingestion run failed", body = NewsErrorResponse)
    )
)]
pub async fn get_news(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Response {
    let query = params
        .q
        .unwrap_or_else(|| state.config.ingest.default_query.clone());
    let max_results = params
        .max_results
        .unwrap_or(state.config.ingest.default_max_results);

    let driver = IngestDriver::new(
        state.fetcher.clone(),
        state.store.clone(),
        &state.config.ingest,
    );

    match driver.run(&query, max_results).await {
        Ok(report) => (
            StatusCode::OK,
            Json(NewsResponse::from_report(&query, max_results, &report)),
        )
            .into_response(),
        Err(failure) => {
            tracing::error!(error = %failure.error, "Ingestion run failed");
            let status = StatusCode::from_u16(failure.error.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(NewsErrorResponse::from_failure(&failure))).into_response()
        }
    }
}

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI specification in JSON format")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;

    Json(ApiDoc::openapi())
}
