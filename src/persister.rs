//! Batched dedup-and-persist stage.
//!
//! A fetched page is processed in fixed-size sub-batches to bound concurrent
//! load on the article store. Within one sub-batch every article is attempted
//! independently and concurrently, and the join is all-settle: one article's
//! failure is captured as its own tagged outcome and never aborts siblings.
//! Sub-batches are strictly sequential with each other.

use crate::db::{ArticleStore, NewSocial, NewThread};
use crate::error::Result;
use crate::types::{ProgressTracker, RawArticle, SaveResult, SaveStats};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of persisting one page of articles
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Ids of newly created threads, in sub-batch completion order
    pub saved_ids: Vec<i64>,

    /// Aggregated save counters for the page
    pub stats: SaveStats,
}

/// Deduplicates and persists batches of raw articles via an [`ArticleStore`]
pub struct BatchPersister {
    store: Arc<dyn ArticleStore>,
    sub_batch_size: usize,
}

impl BatchPersister {
    /// Create a persister over a store, processing `sub_batch_size` articles
    /// concurrently at a time
    pub fn new(store: Arc<dyn ArticleStore>, sub_batch_size: usize) -> Self {
        Self {
            store,
            // a zero sub-batch would never make progress
            sub_batch_size: sub_batch_size.max(1),
        }
    }

    /// Persist one page of articles, folding save stats into the run-level
    /// progress counters.
    pub async fn persist(
        &self,
        articles: &[RawArticle],
        progress: &mut ProgressTracker,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for sub_batch in articles.chunks(self.sub_batch_size) {
            let results = join_all(
                sub_batch
                    .iter()
                    .map(|article| self.save_article(article)),
            )
            .await;

            let mut stats = SaveStats::default();
            for result in &results {
                stats.record(result);
                if let SaveResult::Saved(id) = result {
                    outcome.saved_ids.push(*id);
                }
            }
            outcome.stats.merge(&stats);
        }

        progress.absorb(&outcome.stats);

        debug!(
            articles = articles.len(),
            saved = outcome.stats.saved,
            duplicates = outcome.stats.duplicates,
            errors = outcome.stats.errors,
            "Page persisted"
        );

        outcome
    }

    /// Persist one article; any failure is captured as an outcome, never raised
    async fn save_article(&self, article: &RawArticle) -> SaveResult {
        match self.try_save(article).await {
            Ok(result) => result,
            Err(e) => {
                warn!(url = %article.url, error = %e, "Failed to save article");
                SaveResult::Error(e)
            }
        }
    }

    async fn try_save(&self, article: &RawArticle) -> Result<SaveResult> {
        // Existence check first: a known url is a duplicate, no write occurs.
        if let Some(existing) = self.store.find_by_url(&article.url).await? {
            return Ok(SaveResult::Duplicate(existing.id));
        }

        let thread_id = self
            .store
            .create_thread(&NewThread::from_raw(article))
            .await?;

        // The thread row is already written at this point; a social failure
        // turns the whole article into an error outcome and leaves the
        // thread behind (accepted inconsistency).
        if let Some(social) = &article.social {
            if social.has_data() {
                self.store
                    .create_social(thread_id, &NewSocial::from_social(social))
                    .await?;
            }
        }

        Ok(SaveResult::Saved(thread_id))
    }
}
