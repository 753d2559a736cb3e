//! Reader service
//!
//! Resolves book ids through the catalog and serves content, chapters,
//! table of contents and search results from extracted EPUBs. Extraction and
//! search are CPU bound and run on the blocking pool.

use std::path::PathBuf;
use std::sync::Arc;

use crate::epub::{
    build_toc, extract_book_from_path, search_chapters, validate_query, BookContent, CacheKey,
    Chapter, ExtractedBook, ExtractionCache, SearchResults, TableOfContents,
};
use crate::error::{AppError, Result};
use crate::library::{BookCatalog, BookRecord};

pub struct ReaderService {
    catalog: Arc<BookCatalog>,
    cache: Arc<dyn ExtractionCache>,
}

impl ReaderService {
    pub fn new(catalog: Arc<BookCatalog>, cache: Arc<dyn ExtractionCache>) -> Self {
        Self { catalog, cache }
    }

    pub fn catalog(&self) -> &BookCatalog {
        &self.catalog
    }

    /// Full book content with every sanitized chapter
    pub async fn content(&self, book_id: &str) -> Result<BookContent> {
        let (record, book) = self.load(book_id).await?;

        Ok(BookContent {
            book_id: record.id.clone(),
            title: book_title(&record, &book),
            author: record.author.clone().or_else(|| book.metadata.author.clone()),
            metadata: book.metadata.clone(),
            chapters: book.chapters.clone(),
            total_chapters: book.total_chapters(),
        })
    }

    /// A single chapter by 0-based index
    pub async fn chapter(&self, book_id: &str, index: i64) -> Result<Chapter> {
        let (_, book) = self.load(book_id).await?;
        Ok(book.chapter(index)?.clone())
    }

    pub async fn table_of_contents(&self, book_id: &str) -> Result<TableOfContents> {
        let (record, book) = self.load(book_id).await?;

        Ok(TableOfContents {
            book_title: book_title(&record, &book),
            total_chapters: book.total_chapters(),
            chapters: build_toc(&book.chapters),
        })
    }

    /// Full-text search across the book's chapters.
    ///
    /// The query is validated before the book is loaded.
    pub async fn search(&self, book_id: &str, query: &str, limit: usize) -> Result<SearchResults> {
        let query = validate_query(query)?.to_string();
        let (_, book) = self.load(book_id).await?;

        let results = tokio::task::spawn_blocking(move || {
            search_chapters(&book.chapters, &query, limit)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Search task failed: {}", e)))??;

        Ok(results)
    }

    /// Resolve a book and return its extraction, from the cache if current
    async fn load(&self, book_id: &str) -> Result<(BookRecord, Arc<ExtractedBook>)> {
        let record = self
            .catalog
            .get(book_id)
            .await
            .ok_or_else(|| AppError::BookNotFound(book_id.to_string()))?;

        let path: PathBuf = record
            .epub_path()
            .ok_or_else(|| AppError::EpubUnavailable(book_id.to_string()))?
            .to_path_buf();

        let modified = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("EPUB for book {} missing at {}", book_id, path.display());
                return Err(AppError::EpubUnavailable(book_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let key = CacheKey::new(path.clone(), modified);

        if let Some(book) = self.cache.get(&key) {
            tracing::debug!("Serving book {} from extraction cache", book_id);
            return Ok((record, book));
        }

        let start = std::time::Instant::now();
        let book = tokio::task::spawn_blocking(move || extract_book_from_path(&path))
            .await
            .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))??;
        tracing::info!(
            "Extracted book {} ({} chapters) in {:?}",
            book_id,
            book.total_chapters(),
            start.elapsed()
        );

        let book = Arc::new(book);
        self.cache.insert(key, book.clone());

        Ok((record, book))
    }
}

/// Catalog title, falling back to the package title
fn book_title(record: &BookRecord, book: &ExtractedBook) -> String {
    if !record.title.trim().is_empty() {
        return record.title.clone();
    }
    book.metadata.title.clone().unwrap_or_default()
}
