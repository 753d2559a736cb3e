//! Chapter extraction
//!
//! Walks the spine in reading order, resolves each entry through the
//! manifest and the archive, and turns the surviving XHTML documents into
//! numbered, sanitized chapters.

use std::path::Path;

use super::archive::EpubArchive;
use super::container::resolve_package_path;
use super::error::EpubResult;
use super::package::parse_package;
use super::sanitize::sanitize_chapter;
use super::title::resolve_title;
use super::types::{Chapter, ExtractedBook, PackageDocument};

/// Run the full pipeline over EPUB bytes
pub fn extract_book(data: &[u8]) -> EpubResult<ExtractedBook> {
    let archive = EpubArchive::from_bytes(data)?;
    let opf_path = resolve_package_path(&archive)?;
    let package = parse_package(&archive, &opf_path)?;
    let chapters = extract_chapters(&archive, &package, package_dir(&opf_path))?;

    tracing::debug!(
        "Extracted {} chapters from {} spine entries",
        chapters.len(),
        package.spine.len()
    );

    Ok(ExtractedBook {
        metadata: package.metadata,
        chapters,
    })
}

/// Read an EPUB file fully into memory and extract it
pub fn extract_book_from_path<P: AsRef<Path>>(path: P) -> EpubResult<ExtractedBook> {
    let path = path.as_ref();
    tracing::debug!("Extracting EPUB {}", path.display());
    let data = std::fs::read(path)?;
    extract_book(&data)
}

/// Build the chapter list from the spine.
///
/// Entries whose manifest item is missing or not XHTML are skipped without
/// consuming a chapter number, as are entries whose file is absent from the
/// archive.
pub fn extract_chapters(
    archive: &EpubArchive,
    package: &PackageDocument,
    opf_dir: &str,
) -> EpubResult<Vec<Chapter>> {
    let mut chapters = Vec::new();

    for entry in &package.spine {
        let Some(item) = package.manifest.get(&entry.idref) else {
            tracing::debug!("Spine entry '{}' has no manifest item", entry.idref);
            continue;
        };
        if !item.is_xhtml() {
            continue;
        }

        let Some((path, markup)) = read_item(archive, opf_dir, &item.href) else {
            tracing::warn!(
                "Skipping spine entry '{}': {} not found in archive",
                entry.idref,
                join_path(opf_dir, &item.href)
            );
            continue;
        };

        let order = chapters.len() + 1;
        chapters.push(Chapter {
            id: format!("chapter-{}", order),
            title: resolve_title(&markup, order),
            content: sanitize_chapter(&markup)?,
            order,
            original_path: path,
        });
    }

    Ok(chapters)
}

/// Look up a manifest href, falling back to its percent-decoded form
fn read_item(archive: &EpubArchive, opf_dir: &str, href: &str) -> Option<(String, String)> {
    let path = join_path(opf_dir, href);
    if let Some(markup) = archive.read_string(&path) {
        return Some((path, markup));
    }

    let decoded = urlencoding::decode(href).ok()?;
    if decoded == href {
        return None;
    }
    let path = join_path(opf_dir, &decoded);
    archive.read_string(&path).map(|markup| (path, markup))
}

/// Directory containing the package document ("" at the archive root)
pub fn package_dir(opf_path: &str) -> &str {
    opf_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// POSIX-style join of an archive directory and a relative href
pub fn join_path(base: &str, href: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in base.split('/').chain(href.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    segments.join("/")
}
