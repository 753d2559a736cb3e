//! EPUB reader core
//!
//! Turns EPUB bytes into an ordered list of sanitized chapters and answers
//! table-of-contents and full-text search queries over that list.
//!
//! Pipeline: archive -> container -> package -> chapters (title + sanitize).

mod archive;
mod cache;
mod container;
mod error;
mod extractor;
mod package;
mod sanitize;
mod search;
mod text;
mod title;
mod toc;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use archive::EpubArchive;
pub use cache::{CacheKey, DisabledCache, ExtractionCache, LruExtractionCache};
pub use container::{resolve_package_path, CONTAINER_PATH};
pub use error::{EpubError, EpubResult};
pub use extractor::{extract_book, extract_book_from_path, extract_chapters};
pub use package::{parse_package, parse_package_xml};
pub use sanitize::sanitize_chapter;
pub use search::{search_chapters, validate_query, DEFAULT_SEARCH_LIMIT, EXCERPT_RADIUS, MIN_QUERY_CHARS};
pub use text::plain_text;
pub use title::resolve_title;
pub use toc::build_toc;
pub use types::{
    BookContent, Chapter, ExtractedBook, ManifestItem, PackageMetadata, PackageDocument,
    SearchResult, SearchResults, SpineEntry, TableOfContents, TocEntry,
};
