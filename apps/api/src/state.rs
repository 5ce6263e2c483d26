use std::sync::Arc;

use crate::config::Config;
use crate::layout::PageConfig;
use crate::storage::TableStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// CSV tables. Holds the writer lock, so there must be exactly one per process.
    pub store: Arc<TableStore>,
    /// Page geometry and fonts for the review PDF.
    pub page_config: PageConfig,
}

impl AppState {
    pub fn new(config: Config, page_config: PageConfig) -> Self {
        let store = Arc::new(TableStore::new(&config));
        AppState {
            config,
            store,
            page_config,
        }
    }
}
