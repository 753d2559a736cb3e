//! Chapter title resolution

use std::sync::OnceLock;

use regex::Regex;

use super::text::plain_text;

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(r"(?is)<h[1-6](?:\s[^>]*)?>(.*?)</h[1-6]\s*>").expect("heading pattern is valid")
    })
}

fn title_regex() -> &'static Regex {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    TITLE.get_or_init(|| {
        Regex::new(r"(?is)<title(?:\s[^>]*)?>(.*?)</title\s*>").expect("title pattern is valid")
    })
}

/// Localized fallback used when a chapter has no usable heading or title
pub fn fallback_title(order: usize) -> String {
    format!("الفصل {}", order)
}

/// Derive a chapter title from raw chapter markup.
///
/// Prefers the first `<h1>`..`<h6>`, then the document `<title>`, then the
/// numbered fallback.
pub fn resolve_title(markup: &str, order: usize) -> String {
    first_text(heading_regex(), markup)
        .or_else(|| first_text(title_regex(), markup))
        .unwrap_or_else(|| fallback_title(order))
}

fn first_text(pattern: &Regex, markup: &str) -> Option<String> {
    let inner = pattern.captures(markup)?.get(1)?.as_str();
    let text = plain_text(inner);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
