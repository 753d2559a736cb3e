//! Plain-text helpers shared by the title resolver and the search engine

use std::sync::OnceLock;

use regex::Regex;

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Remove every markup tag, keeping the text between them as-is
pub fn strip_tags(html: &str) -> String {
    tag_regex().replace_all(html, "").into_owned()
}

/// Tag-stripped, entity-decoded text of a markup fragment
pub fn plain_text(html: &str) -> String {
    let stripped = strip_tags(html);
    html_escape::decode_html_entities(&stripped).into_owned()
}
