//! EPUB extraction error types

use thiserror::Error;

/// Errors raised by the EPUB reader core.
///
/// Structural failures (archive, container, package) abort the whole
/// extraction. Per-chapter problems never surface here; the extractor
/// skips those spine entries instead.
#[derive(Debug, Error)]
pub enum EpubError {
    /// The bytes are not a readable zip container
    #[error("Unreadable EPUB archive: {0}")]
    FileFormat(String),

    /// `META-INF/container.xml` is missing or has no usable rootfile
    #[error("Invalid EPUB container: {0}")]
    InvalidContainer(String),

    /// The OPF package document is missing or malformed
    #[error("Invalid EPUB package document: {0}")]
    InvalidPackage(String),

    #[error("Chapter index {index} out of range (book has {total} chapters)")]
    ChapterIndexOutOfRange { index: i64, total: usize },

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// Chapter markup could not be rewritten
    #[error("Markup rewrite failed: {0}")]
    Markup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for EpubError {
    fn from(err: zip::result::ZipError) -> Self {
        EpubError::FileFormat(err.to_string())
    }
}

/// Result type alias for EPUB operations
pub type EpubResult<T> = std::result::Result<T, EpubError>;
