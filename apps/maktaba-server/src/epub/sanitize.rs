//! Chapter markup sanitizer
//!
//! Strips the document shell and non-content elements from chapter XHTML
//! and adds right-to-left friendly inline styles to block elements. Element
//! rewriting goes through lol_html, so only real elements are touched and
//! attribute values are merged rather than appended blindly.
//!
//! The output is a fixed point: sanitizing it again yields identical bytes.

use std::sync::OnceLock;

use lol_html::{element, rewrite_str, RewriteStrSettings};
use regex::Regex;

use super::error::{EpubError, EpubResult};

pub const PARAGRAPH_STYLE: &str = "text-align: right; margin-bottom: 1rem;";
pub const HEADING_STYLE: &str = "text-align: right; margin-top: 2rem; margin-bottom: 1rem;";
pub const BLOCKQUOTE_STYLE: &str = "border-right: 4px solid #e5e7eb; padding-right: 1rem; margin: 1rem 0; font-style: italic; color: #6b7280;";

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

fn prolog_regex() -> &'static Regex {
    static PROLOG: OnceLock<Regex> = OnceLock::new();
    PROLOG.get_or_init(|| {
        Regex::new(r"(?i)<!DOCTYPE[^>]*>|<\?xml[^>]*\?>").expect("prolog pattern is valid")
    })
}

/// XHTML self-closing form of elements whose content the HTML tokenizer
/// reads as raw text
fn self_closing_raw_text_regex() -> &'static Regex {
    static SELF_CLOSING: OnceLock<Regex> = OnceLock::new();
    SELF_CLOSING.get_or_init(|| {
        Regex::new(
            r"(?i)<(script|style|title|textarea|iframe|noscript|noframes|xmp|noembed)(\s[^>]*?)?\s*/>",
        )
        .expect("self-closing pattern is valid")
    })
}

/// Sanitize raw chapter markup for display
pub fn sanitize_chapter(markup: &str) -> EpubResult<String> {
    let without_prolog = prolog_regex().replace_all(markup, "");
    // `<title/>` would otherwise open an element that swallows the document
    let without_prolog = self_closing_raw_text_regex()
        .replace_all(&without_prolog, "<${1}${2}></${1}>")
        .into_owned();

    let mut handlers = vec![
        // Document shell: keep the children of html/body, drop head entirely
        element!("html", |el| {
            el.remove_and_keep_content();
            Ok(())
        }),
        element!("body", |el| {
            el.remove_and_keep_content();
            Ok(())
        }),
        element!("head", |el| {
            el.remove();
            Ok(())
        }),
        element!("link", |el| {
            el.remove();
            Ok(())
        }),
        element!("style", |el| {
            el.remove();
            Ok(())
        }),
        element!("script", |el| {
            el.remove();
            Ok(())
        }),
        element!("p", |el| {
            if let Some(style) = merge_style(el.get_attribute("style"), PARAGRAPH_STYLE) {
                el.set_attribute("style", &style)?;
            }
            Ok(())
        }),
        element!("blockquote", |el| {
            if let Some(style) = merge_style(el.get_attribute("style"), BLOCKQUOTE_STYLE) {
                el.set_attribute("style", &style)?;
            }
            Ok(())
        }),
    ];

    for heading in HEADINGS {
        handlers.push(element!(heading, |el| {
            if let Some(style) = merge_style(el.get_attribute("style"), HEADING_STYLE) {
                el.set_attribute("style", &style)?;
            }
            Ok(())
        }));
    }

    let rewritten = rewrite_str(
        &without_prolog,
        RewriteStrSettings {
            element_content_handlers: handlers,
            strict: false,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| EpubError::Markup(e.to_string()))?;

    Ok(rewritten.trim().to_string())
}

/// New `style` value carrying `directive`, or `None` when it is already there
fn merge_style(existing: Option<String>, directive: &str) -> Option<String> {
    match existing {
        Some(style) if style.contains(directive) => None,
        Some(style) if !style.trim().is_empty() => {
            let base = style.trim().trim_end_matches(';').trim_end();
            Some(format!("{}; {}", base, directive))
        }
        _ => Some(directive.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::test_support::{xhtml_document, xhtml_document_self_closing};

    fn sanitize(markup: &str) -> String {
        sanitize_chapter(markup).unwrap()
    }

    #[test]
    fn test_strips_document_shell() {
        let doc = xhtml_document("Chapter", "<p>النص</p>");
        let clean = sanitize(&doc);

        assert!(!clean.contains("<?xml"));
        assert!(!clean.to_lowercase().contains("<!doctype"));
        assert!(!clean.contains("<html"));
        assert!(!clean.contains("</html>"));
        assert!(!clean.contains("<head"));
        assert!(!clean.contains("<title>"));
        assert!(!clean.contains("<body"));
        assert!(!clean.contains("</body>"));
        assert!(clean.starts_with("<p"));
        assert!(clean.contains("النص"));
    }

    #[test]
    fn test_removes_links_styles_and_scripts() {
        let markup = r#"<link rel="stylesheet" href="a.css"/><style type="text/css">p { color: red; }</style>
<p>Keep</p><script>alert('x')</script><SCRIPT src="b.js"></SCRIPT>"#;
        let clean = sanitize(markup);

        assert!(!clean.contains("link"));
        assert!(!clean.contains("color: red"));
        assert!(!clean.contains("alert"));
        assert!(!clean.to_lowercase().contains("script"));
        assert!(clean.contains("Keep"));
    }

    #[test]
    fn test_styles_paragraphs() {
        let clean = sanitize(r#"<p class="intro">Hello</p>"#);

        assert_eq!(
            clean,
            r#"<p class="intro" style="text-align: right; margin-bottom: 1rem;">Hello</p>"#
        );
    }

    #[test]
    fn test_styles_headings_preserving_level() {
        let clean = sanitize(r#"<h3 id="s1">Section</h3>"#);

        assert!(clean.starts_with(r#"<h3 id="s1" style="text-align: right; margin-top: 2rem; margin-bottom: 1rem;">"#));
        assert!(clean.ends_with("</h3>"));
    }

    #[test]
    fn test_styles_blockquotes() {
        let clean = sanitize("<blockquote><p>quoted</p></blockquote>");

        assert!(clean.contains(&format!("<blockquote style=\"{}\">", BLOCKQUOTE_STYLE)));
        assert!(clean.contains(&format!("<p style=\"{}\">quoted</p>", PARAGRAPH_STYLE)));
    }

    #[test]
    fn test_merges_existing_style() {
        let clean = sanitize(r#"<p style="color: blue">x</p>"#);

        assert_eq!(
            clean,
            r#"<p style="color: blue; text-align: right; margin-bottom: 1rem;">x</p>"#
        );
    }

    #[test]
    fn test_leaves_other_elements_alone() {
        let markup = r#"<div class="c"><span>a</span><pre>b</pre><header>h</header></div>"#;
        assert_eq!(sanitize(markup), markup);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            xhtml_document("One", "<h1>Title</h1><p>para</p><blockquote>q</blockquote>"),
            r#"<p style="color: blue;">x</p><h6 style="">y</h6>"#.to_string(),
            "<HTML><BODY><P>upper</P></BODY></HTML>".to_string(),
            "plain text without markup".to_string(),
            "<p>unclosed paragraph<p>another".to_string(),
            String::new(),
            xhtml_document_self_closing("<p>para<br/>next</p><a id=\"p1\"/>"),
            r#"<p>Before</p><script src="x.js"/><p>After</p><textarea/>"#.to_string(),
        ];

        for input in inputs {
            let once = sanitize(&input);
            let twice = sanitize(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_self_closing_title_keeps_body() {
        let markup = r#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title/><link rel="stylesheet" href="a.css"/></head>
<body><h1>Heading</h1><p>Visible text</p></body></html>"#;
        let clean = sanitize(markup);

        assert!(clean.contains("Heading"));
        assert!(clean.contains("Visible text"));
        assert!(!clean.contains("<title"));
        assert!(!clean.contains("<head"));
    }

    #[test]
    fn test_self_closing_script_in_head_keeps_body() {
        let markup = r#"<html><head><title>T</title><script type="text/javascript" src="a.js"/></head><body><p>Visible text</p></body></html>"#;

        assert_eq!(
            sanitize(markup),
            format!("<p style=\"{}\">Visible text</p>", PARAGRAPH_STYLE)
        );
    }

    #[test]
    fn test_self_closing_script_in_body_is_dropped_alone() {
        let clean = sanitize(r#"<body><p>Before</p><script src="x.js"/><p>After</p></body>"#);

        assert!(clean.contains("Before"));
        assert!(clean.contains("After"));
        assert!(!clean.contains("script"));
    }

    #[test]
    fn test_xhtml_document_with_self_closing_elements() {
        let doc = xhtml_document_self_closing(r#"<p>one<br/>two</p><a id="p1"/><p>three</p>"#);
        let clean = sanitize(&doc);

        assert!(clean.contains("one<br/>two"));
        assert!(clean.contains(r#"<a id="p1"/>"#));
        assert!(clean.contains("three"));
        assert!(!clean.contains("script"));
        assert!(!clean.contains("<title"));
    }

    #[test]
    fn test_merge_style() {
        assert_eq!(merge_style(None, "a: b;"), Some("a: b;".to_string()));
        assert_eq!(merge_style(Some("  ".into()), "a: b;"), Some("a: b;".to_string()));
        assert_eq!(
            merge_style(Some("c: d;".into()), "a: b;"),
            Some("c: d; a: b;".to_string())
        );
        assert_eq!(merge_style(Some("c: d; a: b;".into()), "a: b;"), None);
    }
}
