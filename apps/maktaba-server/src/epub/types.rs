//! EPUB data types
//!
//! Everything here is derived from the EPUB bytes on each extraction and
//! never mutated afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::{EpubError, EpubResult};

/// Media type of the content documents that become chapters
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// Dublin Core metadata from the OPF package document.
///
/// Absent fields stay `None` and are omitted from JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// All `dc:creator` values joined with ", "
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

/// Manifest item (resource in the EPUB)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestItem {
    /// Unique ID within the package document
    pub id: String,
    /// Href relative to the package document, verbatim
    pub href: String,
    /// MIME type
    pub media_type: String,
}

impl ManifestItem {
    pub fn is_xhtml(&self) -> bool {
        self.media_type == XHTML_MEDIA_TYPE
    }
}

/// One `<itemref>` of the spine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpineEntry {
    /// Reference to a manifest item id (may not resolve)
    pub idref: String,
}

/// Parsed OPF package document
#[derive(Debug, Clone, Default)]
pub struct PackageDocument {
    pub metadata: PackageMetadata,
    /// Manifest items keyed by id
    pub manifest: HashMap<String, ManifestItem>,
    /// Reading order
    pub spine: Vec<SpineEntry>,
}

/// A readable chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// `chapter-{order}`
    pub id: String,
    pub title: String,
    /// Sanitized HTML
    pub content: String,
    /// 1-based position among XHTML spine entries
    pub order: usize,
    /// Archive path the chapter was read from
    pub original_path: String,
}

/// Table of contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    pub id: String,
    pub title: String,
    pub order: usize,
    /// 0-based position in the chapter list
    pub index: usize,
}

/// A single search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// 0-based chapter position
    pub chapter_index: usize,
    pub chapter_title: String,
    pub excerpt: String,
    /// Character offset of the match in the chapter's plain text
    pub position: usize,
    /// Query length in characters
    pub match_length: usize,
}

/// Search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchResult>,
}

/// Output of one full extraction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedBook {
    pub metadata: PackageMetadata,
    pub chapters: Vec<Chapter>,
}

impl ExtractedBook {
    pub fn total_chapters(&self) -> usize {
        self.chapters.len()
    }

    /// Chapter at a 0-based index taken from a caller
    pub fn chapter(&self, index: i64) -> EpubResult<&Chapter> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.chapters.get(i))
            .ok_or(EpubError::ChapterIndexOutOfRange {
                index,
                total: self.chapters.len(),
            })
    }
}

/// Full book content response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookContent {
    pub book_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub metadata: PackageMetadata,
    pub chapters: Vec<Chapter>,
    pub total_chapters: usize,
}

/// Table of contents response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOfContents {
    pub book_title: String,
    pub total_chapters: usize,
    pub chapters: Vec<TocEntry>,
}
