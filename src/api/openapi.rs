//! OpenAPI documentation and schema generation
//!
//! Defines the OpenAPI specification for the news-ingest REST API using
//! utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the news-ingest REST API
///
/// The generated spec is served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "news-ingest REST API",
        version = "0.1.0",
        description = "REST API for triggering paginated news ingestion runs against an upstream content-search source",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::api::routes::get_news,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(
        schemas(
            crate::api::response::NewsResponse,
            crate::api::response::NewsData,
            crate::api::response::NewsMeta,
            crate::api::response::NewsErrorResponse,
            crate::types::ProgressTracker,
            crate::error::ApiError,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "news", description = "Ingestion trigger"),
        (name = "system", description = "Health and documentation")
    )
)]
pub struct ApiDoc;
