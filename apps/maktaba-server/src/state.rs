//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::epub::{DisabledCache, ExtractionCache, LruExtractionCache};
use crate::library::BookCatalog;
use crate::service::ReaderService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    reader: ReaderService,
}

impl AppState {
    /// Create the application state around a loaded catalog
    pub fn new(config: Config, catalog: BookCatalog) -> Self {
        let cache: Arc<dyn ExtractionCache> = if config.cache.enabled {
            tracing::info!(
                "EPUB extraction cache enabled ({} books)",
                config.cache.capacity
            );
            Arc::new(LruExtractionCache::new(config.cache.capacity))
        } else {
            tracing::info!("EPUB extraction cache disabled");
            Arc::new(DisabledCache)
        };

        Self {
            inner: Arc::new(AppStateInner {
                config,
                reader: ReaderService::new(Arc::new(catalog), cache),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the reader service
    pub fn reader(&self) -> &ReaderService {
        &self.inner.reader
    }
}
