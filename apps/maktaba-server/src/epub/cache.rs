//! Extraction result cache
//!
//! Extraction output depends only on the file bytes, so results are keyed
//! by path plus modification time. Rewriting the file changes the key and
//! the stale entry ages out of the LRU.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use lru::LruCache;
use parking_lot::Mutex;

use super::types::ExtractedBook;

/// Identity of one version of an EPUB file on disk
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl CacheKey {
    pub fn new(path: impl Into<PathBuf>, modified: SystemTime) -> Self {
        Self {
            path: path.into(),
            modified,
        }
    }

    /// Build a key from the file's current metadata
    pub fn for_file(path: &Path) -> std::io::Result<Self> {
        let modified = std::fs::metadata(path)?.modified()?;
        Ok(Self::new(path, modified))
    }
}

/// Storage for extracted books, shared across requests
pub trait ExtractionCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Arc<ExtractedBook>>;

    fn insert(&self, key: CacheKey, book: Arc<ExtractedBook>);

    /// Number of cached books
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bounded in-memory cache with least-recently-used eviction
pub struct LruExtractionCache {
    entries: Mutex<LruCache<CacheKey, Arc<ExtractedBook>>>,
}

impl LruExtractionCache {
    /// Default number of books kept in memory
    pub const DEFAULT_CAPACITY: usize = 32;

    /// Create a cache holding at most `capacity` books (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl Default for LruExtractionCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl ExtractionCache for LruExtractionCache {
    fn get(&self, key: &CacheKey) -> Option<Arc<ExtractedBook>> {
        self.entries.lock().get(key).cloned()
    }

    fn insert(&self, key: CacheKey, book: Arc<ExtractedBook>) {
        let mut entries = self.entries.lock();
        if let Some((evicted, _)) = entries.push(key, book) {
            tracing::debug!("Evicted cached extraction for {}", evicted.path.display());
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Cache that never stores anything; every request re-extracts
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCache;

impl ExtractionCache for DisabledCache {
    fn get(&self, _key: &CacheKey) -> Option<Arc<ExtractedBook>> {
        None
    }

    fn insert(&self, _key: CacheKey, _book: Arc<ExtractedBook>) {}

    fn len(&self) -> usize {
        0
    }
}
