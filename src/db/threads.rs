//! Thread lookup/insert operations and linked social rows.

use crate::error::DatabaseError;
use crate::{Error, Result};
use async_trait::async_trait;

use super::{ArticleStore, Database, NewSocial, NewThread, SocialRecord, Thread};

impl Database {
    /// Find a thread by its url
    ///
    /// This is the dedup lookup: at most one thread exists per distinct url.
    pub async fn find_by_url(&self, url: &str) -> Result<Option<Thread>> {
        let row = sqlx::query_as::<_, Thread>(
            r#"
            SELECT
                id, url, title, site_domain, site_name, site_type,
                categories, published, performance_score, domain_rank, created_at
            FROM threads
            WHERE url = ?
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to find thread by url: {}",
                e
            )))
        })?;

        Ok(row)
    }

    /// Insert a new thread
    ///
    /// A unique-constraint failure on url (a lost check-then-create race)
    /// surfaces as [`DatabaseError::ConstraintViolation`].
    pub async fn insert_thread(&self, thread: &NewThread) -> Result<i64> {
        let now = chrono::Utc::now().timestamp();
        let categories = serde_json::to_string(&thread.categories)?;

        let result = sqlx::query(
            r#"
            INSERT INTO threads (
                url, title, site_domain, site_name, site_type,
                categories, published, performance_score, domain_rank, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&thread.url)
        .bind(&thread.title)
        .bind(&thread.site_domain)
        .bind(&thread.site_name)
        .bind(&thread.site_type)
        .bind(categories)
        .bind(thread.published)
        .bind(thread.performance_score)
        .bind(thread.domain_rank)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err)
                if db_err.kind() == sqlx::error::ErrorKind::UniqueViolation =>
            {
                Error::Database(DatabaseError::ConstraintViolation(format!(
                    "thread url already exists: {}",
                    thread.url
                )))
            }
            _ => Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to insert thread: {}",
                e
            ))),
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a social engagement row linked to a thread
    pub async fn insert_social(&self, thread_id: i64, social: &NewSocial) -> Result<i64> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO socials (
                thread_id, facebook_likes, facebook_comments, facebook_shares,
                vk_shares, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(thread_id)
        .bind(social.facebook.map(|f| f.likes))
        .bind(social.facebook.map(|f| f.comments))
        .bind(social.facebook.map(|f| f.shares))
        .bind(social.vk.map(|v| v.shares))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err)
                if db_err.kind() == sqlx::error::ErrorKind::UniqueViolation =>
            {
                Error::Database(DatabaseError::ConstraintViolation(format!(
                    "social row already exists for thread {}",
                    thread_id
                )))
            }
            _ => Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to insert social row: {}",
                e
            ))),
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Get the social row for a thread, if one exists
    pub async fn get_social(&self, thread_id: i64) -> Result<Option<SocialRecord>> {
        let row = sqlx::query_as::<_, SocialRecord>(
            r#"
            SELECT id, thread_id, facebook_likes, facebook_comments,
                   facebook_shares, vk_shares, created_at
            FROM socials
            WHERE thread_id = ?
            "#,
        )
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get social row: {}",
                e
            )))
        })?;

        Ok(row)
    }

    /// Count all persisted threads
    pub async fn count_threads(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM threads")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to count threads: {}",
                    e
                )))
            })?;

        Ok(count)
    }
}

#[async_trait]
impl ArticleStore for Database {
    async fn find_by_url(&self, url: &str) -> Result<Option<Thread>> {
        Database::find_by_url(self, url).await
    }

    async fn create_thread(&self, thread: &NewThread) -> Result<i64> {
        self.insert_thread(thread).await
    }

    async fn create_social(&self, thread_id: i64, social: &NewSocial) -> Result<i64> {
        self.insert_social(thread_id, social).await
    }
}
