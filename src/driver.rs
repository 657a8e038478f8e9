//! Pagination driver: orchestrates successive fetches, delegates each page
//! to the batch persister, applies the retry policy on transport failures,
//! and decides termination.
//!
//! A run is a single logical control flow: pages are fetched strictly
//! sequentially, and the driver owns exactly one cursor and one retry
//! counter at a time. There is no cancellation signal; a run always
//! proceeds to a terminal condition (exhausted results, result cap reached,
//! or retries exhausted).
//!
//! Failure handling is asymmetric on purpose: transient transport faults
//! are retried and, once retries are exhausted, absorbed - the run ends as
//! a degraded success with whatever was accumulated. An upstream-reported
//! HTTP error status propagates out of the run immediately, still carrying
//! the progress counters.

use crate::config::IngestConfig;
use crate::db::ArticleStore;
use crate::fetch::FetchSource;
use crate::persister::BatchPersister;
use crate::retry::{IsRetryable, RetryDecision, RetryPolicy};
use crate::types::{IngestFailure, IngestReport, ProgressTracker};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// The driver owns exactly one cursor at a time and replaces it after each
/// successful fetch.
enum Cursor {
    /// No page fetched yet; the next fetch sends the full parameter set
    First,
    /// Opaque next-cursor returned by the upstream source
    Next(String),
}

/// Drives one ingestion run from first fetch to terminal condition
pub struct IngestDriver {
    fetcher: Arc<dyn FetchSource>,
    persister: BatchPersister,
    policy: RetryPolicy,
    page_size: u32,
    page_delay: Duration,
}

impl IngestDriver {
    /// Assemble a driver from its collaborators and configuration
    pub fn new(
        fetcher: Arc<dyn FetchSource>,
        store: Arc<dyn ArticleStore>,
        config: &IngestConfig,
    ) -> Self {
        Self {
            fetcher,
            persister: BatchPersister::new(store, config.sub_batch_size),
            policy: RetryPolicy::new(&config.retry),
            page_size: config.page_size,
            page_delay: config.page_delay,
        }
    }

    /// Run one ingestion: fetch pages for `query` until the upstream is
    /// exhausted, `max_results` saves are reached, or retries run out.
    ///
    /// # Errors
    /// Returns [`IngestFailure`] only for non-retryable faults (an
    /// upstream-reported error status, or an unexpected internal fault);
    /// the failure carries the progress accumulated so far. Exhausted
    /// retries do NOT error - they end the run as a degraded success.
    pub async fn run(
        &self,
        query: &str,
        max_results: u64,
    ) -> std::result::Result<IngestReport, IngestFailure> {
        let mut progress = ProgressTracker::default();
        let mut saved_ids: Vec<i64> = Vec::new();
        let mut cursor = Cursor::First;
        let mut consecutive_failures: u32 = 0;

        info!(%query, max_results, "Starting ingestion run");

        while progress.total_saved < max_results {
            let fetch_result = match &cursor {
                Cursor::First => self.fetcher.fetch_first_page(query, self.page_size).await,
                Cursor::Next(next) => self.fetcher.fetch_next_page(next).await,
            };

            let page = match fetch_result {
                Ok(page) => page,
                Err(e) if e.is_retryable() => {
                    consecutive_failures += 1;
                    progress.errors += 1;
                    match self.policy.on_failure(consecutive_failures) {
                        RetryDecision::RetryAfter(delay) => {
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        RetryDecision::GiveUp => {
                            warn!(
                                errors = progress.errors,
                                total_saved = progress.total_saved,
                                "Retries exhausted, ending run with partial results"
                            );
                            break;
                        }
                    }
                }
                // Non-retryable faults cross the run boundary, progress attached
                Err(error) => return Err(IngestFailure { error, progress }),
            };

            consecutive_failures = 0;
            progress.batches += 1;
            progress.total_fetched += page.posts.len() as u64;

            info!(
                batch = progress.batches,
                articles = page.posts.len(),
                more_results_available = page.more_results_available,
                "Fetched page"
            );

            let outcome = self.persister.persist(&page.posts, &mut progress).await;
            saved_ids.extend(outcome.saved_ids);

            // The upstream counter is authoritative: when it is absent, zero
            // or negative the run stops here, even if a next-cursor was
            // populated defensively.
            if page.more_results_available <= 0 {
                break;
            }

            match page.next {
                Some(next) if progress.total_saved < max_results => {
                    cursor = Cursor::Next(next);
                    // Fixed inter-request delay to respect upstream rate limits
                    tokio::time::sleep(self.page_delay).await;
                }
                _ => break,
            }
        }

        info!(
            total_saved = progress.total_saved,
            total_fetched = progress.total_fetched,
            batches = progress.batches,
            errors = progress.errors,
            "Ingestion run complete"
        );

        Ok(IngestReport {
            total_saved: progress.total_saved,
            saved_ids,
            progress,
        })
    }
}
