//! Database layer for news-ingest
//!
//! Handles SQLite persistence for threads and their social engagement rows.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] — Database lifecycle, schema migrations
//! - [`threads`] — Thread lookup/insert and social rows
//!
//! The [`ArticleStore`] trait is the seam consumed by the batch persister;
//! [`Database`] is its production implementation. `threads.url` carries a
//! UNIQUE constraint, so when two concurrent save attempts race past the
//! existence check, the loser's insert fails with a constraint violation
//! instead of producing a second row.

use crate::error::Result;
use crate::types::{FacebookStats, RawArticle, Social, VkStats, DEFAULT_SITE_TYPE};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, FromRow};

mod migrations;
mod threads;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

/// New thread to be inserted into the database, mapped from a [`RawArticle`]
#[derive(Debug, Clone)]
pub struct NewThread {
    /// Article URL, unique per thread
    pub url: String,
    /// Article title
    pub title: String,
    /// Publishing site domain
    pub site_domain: String,
    /// Publishing site name
    pub site_name: String,
    /// Site type ("news" when the upstream record omits one)
    pub site_type: String,
    /// Category labels, stored as a JSON array
    pub categories: Vec<String>,
    /// Publication time as a Unix timestamp (ingestion time when absent)
    pub published: i64,
    /// Upstream engagement score
    pub performance_score: i64,
    /// Upstream domain ranking
    pub domain_rank: i64,
}

impl NewThread {
    /// Map a raw upstream record to its stored representation, applying
    /// the documented defaults for missing fields.
    pub fn from_raw(raw: &RawArticle) -> Self {
        Self {
            url: raw.url.clone(),
            title: raw.title.clone(),
            site_domain: raw.site.domain.clone(),
            site_name: raw.site.name.clone(),
            site_type: raw
                .site
                .site_type
                .clone()
                .unwrap_or_else(|| DEFAULT_SITE_TYPE.to_string()),
            categories: raw.categories.clone(),
            published: raw.published.unwrap_or_else(Utc::now).timestamp(),
            performance_score: raw.performance_score,
            domain_rank: raw.domain_rank,
        }
    }
}

/// Thread record from database
#[derive(Debug, Clone, FromRow)]
pub struct Thread {
    /// Unique database ID
    pub id: i64,
    /// Article URL, unique per thread
    pub url: String,
    /// Article title
    pub title: String,
    /// Publishing site domain
    pub site_domain: String,
    /// Publishing site name
    pub site_name: String,
    /// Site type (e.g., "news")
    pub site_type: String,
    /// Category labels as a JSON array string
    pub categories: String,
    /// Publication time as a Unix timestamp
    pub published: i64,
    /// Upstream engagement score
    pub performance_score: i64,
    /// Upstream domain ranking
    pub domain_rank: i64,
    /// Unix timestamp when the row was created
    pub created_at: i64,
}

/// New social engagement row linked 1:1 to a thread
#[derive(Debug, Clone, Copy, Default)]
pub struct NewSocial {
    /// Facebook engagement counters, if the raw record carried them
    pub facebook: Option<FacebookStats>,
    /// VK engagement counters, if the raw record carried them
    pub vk: Option<VkStats>,
}

impl NewSocial {
    /// Map a raw social block to its stored representation
    pub fn from_social(social: &Social) -> Self {
        Self {
            facebook: social.facebook,
            vk: social.vk,
        }
    }
}

/// Social engagement record from database
#[derive(Debug, Clone, FromRow)]
pub struct SocialRecord {
    /// Unique database ID
    pub id: i64,
    /// Thread this row belongs to (one row per thread)
    pub thread_id: i64,
    /// Facebook likes
    pub facebook_likes: Option<i64>,
    /// Facebook comments
    pub facebook_comments: Option<i64>,
    /// Facebook shares
    pub facebook_shares: Option<i64>,
    /// VK shares
    pub vk_shares: Option<i64>,
    /// Unix timestamp when the row was created
    pub created_at: i64,
}

/// The Article Store consumed by the batch persister.
///
/// Narrow by design: an existence lookup keyed by url plus two inserts.
/// The check-then-create sequence is not atomic across callers; the
/// production implementation bounds the race with a UNIQUE constraint.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Look up an existing thread by its url
    async fn find_by_url(&self, url: &str) -> Result<Option<Thread>>;

    /// Persist a new thread, returning its id
    async fn create_thread(&self, thread: &NewThread) -> Result<i64>;

    /// Persist a social row linked to a thread, returning its id
    async fn create_social(&self, thread_id: i64, social: &NewSocial) -> Result<i64>;
}

/// SQLite-backed persistence for threads and social rows
#[derive(Debug, Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}
