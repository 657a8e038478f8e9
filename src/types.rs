//! Core data types: upstream wire records, save outcomes, and progress counters.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Site type used when the upstream record omits one
pub const DEFAULT_SITE_TYPE: &str = "news";

/// One raw article record as returned by the upstream search API.
///
/// Every field is optional on the wire; missing fields fall back to
/// documented defaults (empty string, zero, [`DEFAULT_SITE_TYPE`],
/// ingestion time for a missing `published`). The `url` is the dedup key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawArticle {
    /// Article URL, unique per persisted thread
    pub url: String,

    /// Article title
    pub title: String,

    /// Publishing site metadata
    pub site: Site,

    /// Category labels assigned by the upstream source
    pub categories: Vec<String>,

    /// Publication timestamp; ingestion time is used when absent
    pub published: Option<DateTime<Utc>>,

    /// Upstream engagement score
    pub performance_score: i64,

    /// Upstream domain ranking
    pub domain_rank: i64,

    /// Optional social engagement block
    pub social: Option<Social>,
}

/// Publishing site metadata nested inside a [`RawArticle`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    /// Site domain (e.g., "example.com")
    pub domain: String,

    /// Human-readable site name
    pub name: String,

    /// Site type (e.g., "news", "blogs"); defaults to "news" when absent
    #[serde(rename = "type")]
    pub site_type: Option<String>,
}

/// Social engagement block nested inside a [`RawArticle`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Social {
    /// Facebook engagement counters
    pub facebook: Option<FacebookStats>,

    /// VK engagement counters
    pub vk: Option<VkStats>,
}

/// Facebook engagement counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacebookStats {
    /// Number of likes
    pub likes: i64,
    /// Number of comments
    pub comments: i64,
    /// Number of shares
    pub shares: i64,
}

/// VK engagement counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VkStats {
    /// Number of shares
    pub shares: i64,
}

impl Social {
    /// Whether this block carries any engagement data worth persisting
    pub fn has_data(&self) -> bool {
        self.facebook.is_some() || self.vk.is_some()
    }
}

/// One fetch response from the upstream source: a batch of raw articles
/// plus pagination metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Page {
    /// Articles contained in this page (an empty list is valid)
    pub posts: Vec<RawArticle>,

    /// Opaque cursor for the next page, absent on the last page
    pub next: Option<String>,

    /// Upstream-reported count of remaining results. Authoritative over
    /// the presence of `next`: zero or negative means the run stops even
    /// if a cursor is populated.
    pub more_results_available: i64,
}

/// Tagged outcome of attempting to persist one raw article
#[derive(Debug)]
pub enum SaveResult {
    /// A new thread row was created, carrying its id
    Saved(i64),
    /// A thread with this url already exists, carrying the existing id
    Duplicate(i64),
    /// Persistence failed for this article alone, carrying the cause
    Error(Error),
}

/// Per-sub-batch save counters, folded additively into [`ProgressTracker`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaveStats {
    /// Number of newly persisted threads
    pub saved: u64,
    /// Number of articles skipped as duplicates
    pub duplicates: u64,
    /// Number of articles whose persistence failed
    pub errors: u64,
}

impl SaveStats {
    /// Tally one article outcome
    pub fn record(&mut self, result: &SaveResult) {
        match result {
            SaveResult::Saved(_) => self.saved += 1,
            SaveResult::Duplicate(_) => self.duplicates += 1,
            SaveResult::Error(_) => self.errors += 1,
        }
    }

    /// Fold another stats block into this one
    pub fn merge(&mut self, other: &SaveStats) {
        self.saved += other.saved;
        self.duplicates += other.duplicates;
        self.errors += other.errors;
    }
}

/// Run-scoped progress counters.
///
/// Created at the start of an ingestion run and mutated additively by the
/// driver and persister; counters only ever increase and are never reset
/// mid-run. Returned unconditionally on both the success and failure
/// response paths so callers can always reconstruct how far ingestion got.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressTracker {
    /// Total number of articles fetched across all pages
    pub total_fetched: u64,

    /// Total number of new threads persisted
    pub total_saved: u64,

    /// Number of pages successfully fetched
    pub batches: u64,

    /// Number of failed fetch attempts and per-article persistence errors
    pub errors: u64,
}

impl ProgressTracker {
    /// Fold a sub-batch's save stats into the run counters
    pub fn absorb(&mut self, stats: &SaveStats) {
        self.total_saved += stats.saved;
        self.errors += stats.errors;
    }
}

/// Final result of a completed (possibly degraded) ingestion run
#[derive(Debug)]
pub struct IngestReport {
    /// Ids of newly persisted threads, in sub-batch completion order
    pub saved_ids: Vec<i64>,

    /// Total number of threads saved this run
    pub total_saved: u64,

    /// Accumulated progress counters
    pub progress: ProgressTracker,
}

/// A raised run failure, still carrying the progress accumulated so far
#[derive(Debug)]
pub struct IngestFailure {
    /// The error that escaped the run
    pub error: Error,

    /// Progress accumulated before the failure
    pub progress: ProgressTracker,
}
