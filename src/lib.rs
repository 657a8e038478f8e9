//! # news-ingest
//!
//! Ingestion engine for a paginated upstream content-search API.
//!
//! A run walks the upstream's cursor-based pages for a query, persists
//! each page's articles into SQLite in small concurrent sub-batches with
//! url-based deduplication, and accumulates progress counters that are
//! reported on every outcome, success or failure.
//!
//! ## Design Philosophy
//!
//! - **Resilient by default** - transient transport faults are retried
//!   with linear backoff; exhausted retries degrade to a partial success
//!   instead of losing what was already saved
//! - **Sensible defaults** - works out of the box apart from the upstream
//!   API token
//! - **Library-first** - the REST trigger is a thin layer over the same
//!   driver a consumer can embed directly
//!
//! ## Quick Start
//!
//! ```no_run
//! use news_ingest::{Config, Database, IngestDriver, WebzClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.ingest.api_token = "my-token".to_string();
//!
//!     let db = Arc::new(Database::new(&config.database_path).await?);
//!     let client = Arc::new(WebzClient::new(&config.ingest)?);
//!
//!     let driver = IngestDriver::new(client, db, &config.ingest);
//!     match driver.run("LightSpeed", 200).await {
//!         Ok(report) => println!("saved {} articles", report.total_saved),
//!         Err(failure) => eprintln!("run failed: {}", failure.error),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Pagination driver orchestrating fetch, persist, and retry
pub mod driver;
/// Error types
pub mod error;
/// Upstream fetch source and HTTP client
pub mod fetch;
/// Concurrent sub-batch persistence with deduplication
pub mod persister;
/// Retry policy with linear backoff
pub mod retry;
/// Core types: wire records, save outcomes, progress counters
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, Config, IngestConfig, RetryConfig};
pub use db::{ArticleStore, Database};
pub use driver::IngestDriver;
pub use error::{ApiError, DatabaseError, Error, ErrorDetail, Result, ToHttpStatus};
pub use fetch::{FetchSource, WebzClient};
pub use persister::BatchPersister;
pub use retry::{IsRetryable, RetryDecision, RetryPolicy};
pub use types::{
    IngestFailure, IngestReport, Page, ProgressTracker, RawArticle, SaveResult, SaveStats,
};
