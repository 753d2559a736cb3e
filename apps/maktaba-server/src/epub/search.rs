//! In-book full-text search
//!
//! Literal, case-insensitive substring search over the plain text of every
//! chapter. Offsets and lengths are counted in characters so that excerpts
//! never split a multi-byte character.

use super::error::{EpubError, EpubResult};
use super::text::plain_text;
use super::types::{Chapter, SearchResult, SearchResults};

/// Result limit used when the caller does not give one
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Shortest accepted query, in characters, after trimming
pub const MIN_QUERY_CHARS: usize = 2;

/// Characters of context kept on each side of a match
pub const EXCERPT_RADIUS: usize = 100;

/// Search all chapters in reading order.
///
/// Matches within a chapter are reported left to right and never overlap.
/// Scanning stops as soon as `limit` results have been collected, even in
/// the middle of a chapter.
pub fn search_chapters(
    chapters: &[Chapter],
    query: &str,
    limit: usize,
) -> EpubResult<SearchResults> {
    let query = validate_query(query)?;
    let needle = fold(query);
    let mut results = Vec::new();

    'chapters: for (chapter_index, chapter) in chapters.iter().enumerate() {
        if results.len() >= limit {
            break;
        }

        let text: Vec<char> = plain_text(&chapter.content).chars().collect();
        let haystack: Vec<char> = text.iter().map(|c| fold_char(*c)).collect();

        let mut search_pos = 0;
        while let Some(offset) = find(&haystack[search_pos..], &needle) {
            let position = search_pos + offset;

            results.push(SearchResult {
                chapter_index,
                chapter_title: chapter.title.clone(),
                excerpt: excerpt(&text, position, needle.len()),
                position,
                match_length: needle.len(),
            });

            if results.len() >= limit {
                break 'chapters;
            }

            search_pos = position + needle.len();
        }
    }

    tracing::debug!("Search for '{}' found {} results", query, results.len());

    Ok(SearchResults {
        query: query.to_string(),
        total_results: results.len(),
        results,
    })
}

/// Trim a query and reject it when it is too short to search for
pub fn validate_query(query: &str) -> EpubResult<&str> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Err(EpubError::InvalidQuery(format!(
            "query must be at least {} characters",
            MIN_QUERY_CHARS
        )));
    }
    Ok(query)
}

/// Lowercase one character without changing the character count
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn fold(text: &str) -> Vec<char> {
    text.chars().map(fold_char).collect()
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Context window around a match, clamped to the text and trimmed
fn excerpt(text: &[char], position: usize, match_len: usize) -> String {
    let start = position.saturating_sub(EXCERPT_RADIUS);
    let end = (position + match_len + EXCERPT_RADIUS).min(text.len());

    text[start..end].iter().collect::<String>().trim().to_string()
}
