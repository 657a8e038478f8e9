use crate::db::*;
use crate::error::{DatabaseError, Error};
use crate::types::{FacebookStats, RawArticle, Site, VkStats};
use chrono::{TimeZone, Utc};

fn sample_thread(url: &str) -> NewThread {
    NewThread {
        url: url.to_string(),
        title: "Test Article".to_string(),
        site_domain: "example.com".to_string(),
        site_name: "Example".to_string(),
        site_type: "news".to_string(),
        categories: vec!["tech".to_string()],
        published: 1_700_000_000,
        performance_score: 5,
        domain_rank: 1200,
    }
}

#[tokio::test]
async fn test_insert_and_find_by_url() {
    let db = Database::new_in_memory().await.unwrap();

    let id = db
        .insert_thread(&sample_thread("https://example.com/article-1"))
        .await
        .unwrap();
    assert!(id > 0);

    let found = db
        .find_by_url("https://example.com/article-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.title, "Test Article");
    assert_eq!(found.site_domain, "example.com");
    assert_eq!(found.categories, r#"["tech"]"#);

    let missing = db.find_by_url("https://example.com/other").await.unwrap();
    assert!(missing.is_none());

    db.close().await;
}

#[tokio::test]
async fn test_duplicate_url_is_a_constraint_violation() {
    let db = Database::new_in_memory().await.unwrap();

    db.insert_thread(&sample_thread("https://example.com/article-1"))
        .await
        .unwrap();

    let err = db
        .insert_thread(&sample_thread("https://example.com/article-1"))
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            Error::Database(DatabaseError::ConstraintViolation(_))
        ),
        "second insert for the same url should be a constraint violation, got {err:?}"
    );

    // Still exactly one row
    assert_eq!(db.count_threads().await.unwrap(), 1);

    db.close().await;
}

#[tokio::test]
async fn test_insert_social_linked_to_thread() {
    let db = Database::new_in_memory().await.unwrap();

    let thread_id = db
        .insert_thread(&sample_thread("https://example.com/article-1"))
        .await
        .unwrap();

    let social = NewSocial {
        facebook: Some(FacebookStats {
            likes: 10,
            comments: 2,
            shares: 4,
        }),
        vk: Some(VkStats { shares: 1 }),
    };
    let social_id = db.insert_social(thread_id, &social).await.unwrap();
    assert!(social_id > 0);

    let row = db.get_social(thread_id).await.unwrap().unwrap();
    assert_eq!(row.thread_id, thread_id);
    assert_eq!(row.facebook_likes, Some(10));
    assert_eq!(row.facebook_comments, Some(2));
    assert_eq!(row.facebook_shares, Some(4));
    assert_eq!(row.vk_shares, Some(1));

    db.close().await;
}

#[tokio::test]
async fn test_social_without_facebook_block_stores_nulls() {
    let db = Database::new_in_memory().await.unwrap();

    let thread_id = db
        .insert_thread(&sample_thread("https://example.com/article-1"))
        .await
        .unwrap();

    let social = NewSocial {
        facebook: None,
        vk: Some(VkStats { shares: 9 }),
    };
    db.insert_social(thread_id, &social).await.unwrap();

    let row = db.get_social(thread_id).await.unwrap().unwrap();
    assert_eq!(row.facebook_likes, None);
    assert_eq!(row.vk_shares, Some(9));

    db.close().await;
}

#[tokio::test]
async fn test_social_requires_existing_thread() {
    let db = Database::new_in_memory().await.unwrap();

    let result = db.insert_social(9999, &NewSocial::default()).await;
    assert!(result.is_err(), "foreign key should reject orphan social rows");

    db.close().await;
}

#[tokio::test]
async fn test_second_social_row_per_thread_is_rejected() {
    let db = Database::new_in_memory().await.unwrap();

    let thread_id = db
        .insert_thread(&sample_thread("https://example.com/article-1"))
        .await
        .unwrap();

    db.insert_social(thread_id, &NewSocial::default())
        .await
        .unwrap();
    let err = db
        .insert_social(thread_id, &NewSocial::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Database(DatabaseError::ConstraintViolation(_))
    ));

    db.close().await;
}

#[test]
fn test_new_thread_from_raw_applies_defaults() {
    let raw = RawArticle {
        url: "https://example.com/article-1".to_string(),
        ..Default::default()
    };

    let before = Utc::now().timestamp();
    let thread = NewThread::from_raw(&raw);
    let after = Utc::now().timestamp();

    assert_eq!(thread.url, "https://example.com/article-1");
    assert_eq!(thread.title, "");
    assert_eq!(thread.site_type, "news");
    assert!(thread.categories.is_empty());
    // missing published falls back to ingestion time
    assert!(thread.published >= before && thread.published <= after);
    assert_eq!(thread.performance_score, 0);
    assert_eq!(thread.domain_rank, 0);
}

#[test]
fn test_new_thread_from_raw_keeps_explicit_fields() {
    let published = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let raw = RawArticle {
        url: "https://example.com/article-2".to_string(),
        title: "Explicit".to_string(),
        site: Site {
            domain: "example.com".to_string(),
            name: "Example".to_string(),
            site_type: Some("blogs".to_string()),
        },
        categories: vec!["finance".to_string(), "tech".to_string()],
        published: Some(published),
        performance_score: 8,
        domain_rank: 300,
        social: None,
    };

    let thread = NewThread::from_raw(&raw);
    assert_eq!(thread.title, "Explicit");
    assert_eq!(thread.site_type, "blogs");
    assert_eq!(thread.categories.len(), 2);
    assert_eq!(thread.published, published.timestamp());
    assert_eq!(thread.performance_score, 8);
}
