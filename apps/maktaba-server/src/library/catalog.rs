//! In-memory book catalog
//!
//! Loaded once at startup from a JSON array of book records.

use std::collections::HashMap;
use std::path::Path;

use tokio::sync::RwLock;

use crate::error::Result;

use super::book::BookRecord;

/// Book records keyed by id
#[derive(Debug, Default)]
pub struct BookCatalog {
    books: RwLock<HashMap<String, BookRecord>>,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, resolving relative EPUB paths against `root`
    pub fn from_records(records: Vec<BookRecord>, root: &Path) -> Self {
        let books = records
            .into_iter()
            .map(|mut record| {
                if let Some(file) = record.files.epub.as_mut() {
                    if file.path.is_relative() {
                        file.path = root.join(&file.path);
                    }
                }
                (record.id.clone(), record)
            })
            .collect();

        Self {
            books: RwLock::new(books),
        }
    }

    /// Load the catalog file. A missing file yields an empty catalog.
    pub async fn load(catalog_path: &Path, root: &Path) -> Result<Self> {
        let data = match tokio::fs::read(catalog_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    "Catalog {} not found, starting with an empty library",
                    catalog_path.display()
                );
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<BookRecord> = serde_json::from_slice(&data)?;
        tracing::info!(
            "Loaded {} book records from {}",
            records.len(),
            catalog_path.display()
        );

        Ok(Self::from_records(records, root))
    }

    pub async fn get(&self, id: &str) -> Option<BookRecord> {
        self.books.read().await.get(id).cloned()
    }

    /// Add or replace a record as given
    pub async fn insert(&self, record: BookRecord) {
        self.books.write().await.insert(record.id.clone(), record);
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}
