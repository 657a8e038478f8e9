//! Application state for the API server

use crate::config::Config;
use crate::db::ArticleStore;
use crate::fetch::FetchSource;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone). Handlers
/// assemble an ingestion driver from the fetch source and store for each
/// triggered run; the collaborators themselves are shared.
#[derive(Clone)]
pub struct AppState {
    /// The upstream page source
    pub fetcher: Arc<dyn FetchSource>,

    /// The article persistence backend
    pub store: Arc<dyn ArticleStore>,

    /// Configuration (read access)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        fetcher: Arc<dyn FetchSource>,
        store: Arc<dyn ArticleStore>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            fetcher,
            store,
            config,
        }
    }
}
