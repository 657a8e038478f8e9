use super::*;
use crate::db::Database;
use crate::fetch::WebzClient;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};


fn test_config(upstream: &str) -> Config {
    let mut config = Config::default();
    config.ingest.search_url = format!("{upstream}/search");
    config.ingest.api_token = "test-token".to_string();
    // keep tests fast: no inter-page delay, millisecond backoff
    config.ingest.page_delay = Duration::from_millis(0);
    config.ingest.retry.base_delay = Duration::from_millis(1);
    config
}

/// Full-stack test app: real HTTP client against a wiremock upstream,
/// real schema in an in-memory database.
async fn test_app(server: &MockServer) -> (Router, Arc<Database>) {
    let config = Arc::new(test_config(&server.uri()));
    let client = Arc::new(WebzClient::new(&config.ingest).unwrap());
    let db = Arc::new(Database::new_in_memory().await.unwrap());
    let app = create_router(client, db.clone(), config);
    (app, db)
}

fn page_body(prefix: &str, count: usize, next: Option<&str>, more: i64) -> serde_json::Value {
    let posts: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "url": format!("https://example.com/{prefix}-{i}"),
                "title": format!("Test Article {i}"),
                "site": { "domain": "example.com", "name": "Example" },
            })
        })
        .collect();
    json!({
        "posts": posts,
        "next": next,
        "moreResultsAvailable": more,
    })
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).expect("response body should be JSON");
    (status, json)
}
