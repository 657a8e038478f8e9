//! Response payloads for the ingestion trigger endpoint.
//!
//! Both the success and failure shapes carry the run's progress counters,
//! so a caller can always see how far ingestion got regardless of outcome.

use crate::error::{Error, ToHttpStatus};
use crate::types::{IngestFailure, IngestReport, ProgressTracker};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cap on the number of ids echoed back in a success payload
pub const MAX_RETURNED_IDS: usize = 100;

/// Message used when an internal fault must not leak details to the caller
const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Success payload for a completed (possibly degraded) ingestion run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsResponse {
    /// Always `true` on this shape
    pub success: bool,

    /// What the run produced
    pub data: NewsData,

    /// Run metadata and counters
    pub meta: NewsMeta,
}

/// Result data inside a success payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsData {
    /// Number of new articles persisted this run
    pub total_articles_saved: u64,

    /// Ids of the persisted articles, stringified, capped at
    /// [`MAX_RETURNED_IDS`]
    pub article_ids: Vec<String>,
}

/// Run metadata inside a success payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsMeta {
    /// The query the run was executed with
    pub query: String,

    /// Accumulated progress counters
    pub progress: ProgressTracker,

    /// Whether more results likely remain below the requested cap
    pub has_more: bool,

    /// Number of pages processed
    pub batches_processed: u64,

    /// Number of errors absorbed during the run
    pub total_errors: u64,
}

impl NewsResponse {
    /// Build the success payload from a finished run
    pub fn from_report(query: &str, max_results: u64, report: &IngestReport) -> Self {
        let article_ids = report
            .saved_ids
            .iter()
            .take(MAX_RETURNED_IDS)
            .map(i64::to_string)
            .collect();

        Self {
            success: true,
            data: NewsData {
                total_articles_saved: report.total_saved,
                article_ids,
            },
            meta: NewsMeta {
                query: query.to_string(),
                has_more: report.progress.total_fetched < max_results,
                batches_processed: report.progress.batches,
                total_errors: report.progress.errors,
                progress: report.progress.clone(),
            },
        }
    }
}

/// Failure payload for a run that raised, progress still attached
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsErrorResponse {
    /// Always `false` on this shape
    pub success: bool,

    /// Human-readable error message
    pub error: String,

    /// HTTP status code, mirrored into the body
    pub code: u16,

    /// Progress accumulated before the failure
    pub progress: ProgressTracker,
}

impl NewsErrorResponse {
    /// Build the failure payload from a raised run failure.
    ///
    /// An upstream-reported status is forwarded with its message; anything
    /// else collapses to a generic 500 so internals do not leak.
    pub fn from_failure(failure: &IngestFailure) -> Self {
        let (code, error) = match &failure.error {
            Error::UpstreamStatus { .. } => {
                (failure.error.status_code(), failure.error.to_string())
            }
            _ => (500, GENERIC_ERROR_MESSAGE.to_string()),
        };

        Self {
            success: false,
            error,
            code,
            progress: failure.progress.clone(),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn report(saved_ids: Vec<i64>, progress: ProgressTracker) -> IngestReport {
        IngestReport {
            total_saved: progress.total_saved,
            saved_ids,
            progress,
        }
    }

    #[test]
    fn success_payload_shape() {
        let progress = ProgressTracker {
            total_fetched: 20,
            total_saved: 20,
            batches: 2,
            errors: 0,
        };
        let response = NewsResponse::from_report("TestQuery", 20, &report(vec![1, 2, 3], progress));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["totalArticlesSaved"], 20);
        assert_eq!(json["data"]["articleIds"][0], "1");
        assert_eq!(json["meta"]["query"], "TestQuery");
        assert_eq!(json["meta"]["hasMore"], false);
        assert_eq!(json["meta"]["batchesProcessed"], 2);
        assert_eq!(json["meta"]["totalErrors"], 0);
        assert_eq!(json["meta"]["progress"]["totalFetched"], 20);
    }

    #[test]
    fn has_more_reflects_the_cap() {
        let progress = ProgressTracker {
            total_fetched: 10,
            total_saved: 10,
            batches: 1,
            errors: 0,
        };
        let response = NewsResponse::from_report("q", 200, &report(vec![], progress));
        assert!(response.meta.has_more);
    }

    #[test]
    fn returned_ids_are_capped_and_stringified() {
        let ids: Vec<i64> = (1..=150).collect();
        let progress = ProgressTracker {
            total_fetched: 150,
            total_saved: 150,
            batches: 2,
            errors: 0,
        };
        let response = NewsResponse::from_report("q", 200, &report(ids, progress));

        assert_eq!(response.data.article_ids.len(), MAX_RETURNED_IDS);
        assert_eq!(response.data.article_ids[0], "1");
        assert_eq!(response.data.article_ids[99], "100");
        assert_eq!(response.data.total_articles_saved, 150);
    }

    #[test]
    fn upstream_failure_forwards_status_and_message() {
        let failure = IngestFailure {
            error: Error::UpstreamStatus {
                status: 429,
                message: "Rate limited".to_string(),
            },
            progress: ProgressTracker::default(),
        };
        let response = NewsErrorResponse::from_failure(&failure);

        assert!(!response.success);
        assert_eq!(response.code, 429);
        assert!(response.error.contains("Rate limited"));
    }

    #[test]
    fn internal_failure_collapses_to_generic_500() {
        let failure = IngestFailure {
            error: Error::Other("connection pool exhausted".to_string()),
            progress: ProgressTracker {
                total_fetched: 10,
                total_saved: 8,
                batches: 1,
                errors: 2,
            },
        };
        let response = NewsErrorResponse::from_failure(&failure);

        assert_eq!(response.code, 500);
        assert_eq!(response.error, "An unexpected error occurred");
        // internals must not leak
        assert!(!response.error.contains("pool"));
        // progress is still attached
        assert_eq!(response.progress.total_saved, 8);
    }
}
