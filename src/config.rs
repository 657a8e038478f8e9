//! Configuration types
//!
//! All settings have sensible defaults so a [`Config`] works out of the box
//! (apart from the upstream API token). Durations serialize as integer
//! seconds, except where noted as milliseconds.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use utoipa::ToSchema;

/// Top-level configuration for the ingestion service
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Ingestion engine settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ingest: IngestConfig::default(),
            api: ApiConfig::default(),
            database_path: default_database_path(),
        }
    }
}

impl Config {
    /// Validate settings that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        if self.ingest.search_url.is_empty() {
            return Err(Error::Config {
                message: "search_url must not be empty".to_string(),
                key: Some("search_url".to_string()),
            });
        }
        if url::Url::parse(&self.ingest.search_url).is_err() {
            return Err(Error::Config {
                message: format!("search_url is not a valid URL: {}", self.ingest.search_url),
                key: Some("search_url".to_string()),
            });
        }
        if self.ingest.page_size == 0 {
            return Err(Error::Config {
                message: "page_size must be positive".to_string(),
                key: Some("page_size".to_string()),
            });
        }
        if self.ingest.sub_batch_size == 0 {
            return Err(Error::Config {
                message: "sub_batch_size must be positive".to_string(),
                key: Some("sub_batch_size".to_string()),
            });
        }
        Ok(())
    }
}

/// Ingestion engine configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestConfig {
    /// Upstream search endpoint, also the base for resolving relative
    /// pagination cursors (default: the webz.io news search endpoint)
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// API token sent with the first-page request
    #[serde(default)]
    pub api_token: String,

    /// Query used when the caller supplies none (default: "LightSpeed")
    #[serde(default = "default_query")]
    pub default_query: String,

    /// Result cap used when the caller supplies none (default: 200)
    #[serde(default = "default_max_results")]
    pub default_max_results: u64,

    /// Articles requested per page (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Articles persisted concurrently per sub-batch (default: 10)
    #[serde(default = "default_sub_batch_size")]
    pub sub_batch_size: usize,

    /// Delay between successive page fetches, in milliseconds (default: 1500).
    /// Respects upstream rate limits; not a correctness requirement.
    #[serde(default = "default_page_delay", with = "duration_ms_serde")]
    pub page_delay: Duration,

    /// Per-request timeout budget (default: 15 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Retry behavior for transient fetch failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            api_token: String::new(),
            default_query: default_query(),
            default_max_results: default_max_results(),
            page_size: default_page_size(),
            sub_batch_size: default_sub_batch_size(),
            page_delay: default_page_delay(),
            request_timeout: default_request_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for transient fetch failures
///
/// Backoff is linear: the delay before attempt `n` is `base_delay * n`
/// (3s, 6s, 9s with the defaults). The attempt counter bounds consecutive
/// failures at one cursor position; it resets after any successful fetch.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetryConfig {
    /// Maximum number of retries per failing fetch point (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay multiplied by the attempt number (default: 3 seconds)
    #[serde(default = "default_base_delay", with = "duration_serde")]
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay: default_base_delay(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("news-ingest.db")
}

fn default_search_url() -> String {
    "https://api.webz.io/newsApiLite".to_string()
}

fn default_query() -> String {
    "LightSpeed".to_string()
}

fn default_max_results() -> u64 {
    200
}

fn default_page_size() -> u32 {
    100
}

fn default_sub_batch_size() -> usize {
    10
}

fn default_page_delay() -> Duration {
    Duration::from_millis(1500)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay() -> Duration {
    Duration::from_secs(3)
}

fn default_bind_address() -> SocketAddr {
    #[allow(clippy::expect_used)]
    "127.0.0.1:8080"
        .parse()
        .expect("hardcoded bind address is valid")
}

fn default_true() -> bool {
    true
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.ingest.default_query, "LightSpeed");
        assert_eq!(config.ingest.default_max_results, 200);
        assert_eq!(config.ingest.page_size, 100);
        assert_eq!(config.ingest.sub_batch_size, 10);
        assert_eq!(config.ingest.page_delay, Duration::from_millis(1500));
        assert_eq!(config.ingest.request_timeout, Duration::from_secs(15));
        assert_eq!(config.ingest.retry.max_retries, 3);
        assert_eq!(config.ingest.retry.base_delay, Duration::from_secs(3));
    }

    #[test]
    fn default_config_validates() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn empty_search_url_is_rejected() {
        let mut config = Config::default();
        config.ingest.search_url = String::new();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config { key: Some(ref k), .. } if k == "search_url"));
    }

    #[test]
    fn malformed_search_url_is_rejected() {
        let mut config = Config::default();
        config.ingest.search_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = Config::default();
        config.ingest.page_size = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config { key: Some(ref k), .. } if k == "page_size"));
    }

    #[test]
    fn durations_round_trip_with_documented_units() {
        let config = IngestConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        // page_delay in milliseconds, request_timeout in seconds
        assert_eq!(json["page_delay"], 1500);
        assert_eq!(json["request_timeout"], 15);

        let parsed: IngestConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.page_delay, Duration::from_millis(1500));
        assert_eq!(parsed.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let json = r#"{ "retry": { "max_retries": 5 } }"#;
        let config: IngestConfig = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay, Duration::from_secs(3));
        assert_eq!(config.page_size, 100);
    }
}
