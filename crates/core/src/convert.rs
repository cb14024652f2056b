//! HTML to plain text conversion with a DOM fallback.
//!
//! The primary converter rewrites the markup according to [`ConvertOptions`]
//! and renders it with htmd. If it fails for any reason the page is parsed
//! with html5ever and its text nodes are collected instead.

use std::sync::LazyLock;

use ego_tree::iter::Edge;
use lol_html::html_content::ContentType;
use regex::Regex;
use scraper::{Html, Node};

use crate::{Result, SerapisError};

static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").expect("hardcoded regex pattern is valid"));

/// Backslash escapes htmd puts in front of markdown-significant characters.
static MARKDOWN_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\([\\`*_{}\[\]()#+\-.!>|<~=])").expect("hardcoded regex pattern is valid")
});

/// Elements whose end separates the text before and after them.
const BLOCK_ELEMENTS: [&str; 26] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "ol", "p", "pre", "section", "tr",
];

/// Rendering switches for the primary converter.
///
/// The value is immutable once built and can be shared between threads.
/// Output is never line-wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Render link text only, without targets.
    pub ignore_links: bool,
    /// Drop images entirely.
    pub ignore_images: bool,
    /// Render emphasized text without markers.
    pub ignore_emphasis: bool,
    /// Flatten tables into one paragraph per row.
    pub bypass_tables: bool,
    /// Render in-page anchor links as plain text.
    pub ignore_anchors: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { ignore_links: true, ignore_images: true, ignore_emphasis: true, bypass_tables: true, ignore_anchors: true }
    }
}

/// Converts an HTML document to plain text.
pub trait TextConverter: Send + Sync {
    fn convert(&self, html: &str) -> Result<String>;
}

/// Streaming rewrite followed by markdown rendering.
#[derive(Debug, Clone, Default)]
pub struct MarkdownTextConverter {
    options: ConvertOptions,
}

impl MarkdownTextConverter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }
}

impl TextConverter for MarkdownTextConverter {
    fn convert(&self, html: &str) -> Result<String> {
        let rewritten = apply_options(html, &self.options)?;
        render_markdown(&rewritten)
    }
}

/// Parser-based converter used when the primary converter fails.
///
/// Drops `<head>`, `<script>`, and comment sections (`class="comments"` or
/// `id="comments"`), then joins the remaining text nodes. A line break
/// follows every block element so minified paragraphs stay apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomTextConverter;

impl TextConverter for DomTextConverter {
    fn convert(&self, html: &str) -> Result<String> {
        Ok(dom_text(html))
    }
}

/// Converts `html` with `primary`, falling back to [`DomTextConverter`].
///
/// The fallback is an expected degradation and is logged at `info`.
pub fn html_to_text(html: &str, primary: &dyn TextConverter, url: &str) -> Result<String> {
    match primary.convert(html) {
        Ok(text) => Ok(text),
        Err(err) => {
            tracing::info!(url, error = %err, "Falling back on DOM text extraction for '{url}'");
            DomTextConverter.convert(html)
        }
    }
}

/// Rewrite the markup so htmd renders plain text for the disabled constructs.
fn apply_options(html: &str, options: &ConvertOptions) -> Result<String> {
    let options = *options;
    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![lol_html::element!("*", move |el| {
                let tag = el.tag_name();
                match tag.as_str() {
                    "a" if options.ignore_links => el.remove_and_keep_content(),
                    "a" if options.ignore_anchors && el.get_attribute("href").is_some_and(|h| h.starts_with('#')) => {
                        el.remove_and_keep_content()
                    }
                    "img" if options.ignore_images => el.remove(),
                    "em" | "i" | "b" | "strong" if options.ignore_emphasis => el.remove_and_keep_content(),
                    "table" | "thead" | "tbody" | "tfoot" if options.bypass_tables => el.remove_and_keep_content(),
                    "tr" if options.bypass_tables => el.set_tag_name("p")?,
                    "td" | "th" if options.bypass_tables => {
                        el.after(" ", ContentType::Text);
                        el.remove_and_keep_content();
                    }
                    _ => {}
                }
                Ok(())
            })],
            ..Default::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| SerapisError::ConversionError(e.to_string()))?;
    rewriter.end().map_err(|e| SerapisError::ConversionError(e.to_string()))?;

    String::from_utf8(output).map_err(|e| SerapisError::ConversionError(e.to_string()))
}

#[cfg(feature = "markdown")]
fn render_markdown(html: &str) -> Result<String> {
    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["head", "script", "style", "noscript"])
        .build();

    let markdown = converter
        .convert(html)
        .map_err(|e| SerapisError::ConversionError(e.to_string()))?;

    Ok(MARKDOWN_ESCAPE.replace_all(&markdown, "$1").into_owned())
}

#[cfg(not(feature = "markdown"))]
fn render_markdown(_html: &str) -> Result<String> {
    Err(SerapisError::ConversionError("markdown rendering is not compiled in".to_string()))
}

fn dom_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();
    let mut skipping = None;

    for edge in document.tree.root().traverse() {
        match edge {
            Edge::Open(node) if skipping.is_none() => match node.value() {
                Node::Element(el) if is_excluded(el) => skipping = Some(node.id()),
                Node::Text(t) => text.push_str(t),
                _ => {}
            },
            Edge::Close(node) if skipping == Some(node.id()) => skipping = None,
            Edge::Close(node) if skipping.is_none() => {
                if let Node::Element(el) = node.value()
                    && BLOCK_ELEMENTS.contains(&el.name())
                {
                    text.push('\n');
                }
            }
            _ => {}
        }
    }

    BLANK_RUNS.replace_all(&text, "\n\n").into_owned()
}

fn is_excluded(el: &scraper::node::Element) -> bool {
    matches!(el.name(), "head" | "script")
        || el.id().is_some_and(|id| id.eq_ignore_ascii_case("comments"))
        || el.classes().any(|class| class.eq_ignore_ascii_case("comments"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingConverter;

    impl TextConverter for FailingConverter {
        fn convert(&self, _html: &str) -> Result<String> {
            Err(SerapisError::ConversionError("boom".to_string()))
        }
    }

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Head Title</title><style>p { color: red; }</style></head>
<body>
<p>First <b>bold</b> words with a <a href="https://example.com/x">link</a>.</p>
<p><img src="cat.png" alt="cat"> Second paragraph.</p>
<script>var tracked = true;</script>
</body>
</html>"#;

    #[test]
    fn test_default_options_disable_everything() {
        let options = ConvertOptions::default();
        assert!(options.ignore_links && options.ignore_images && options.ignore_emphasis);
        assert!(options.bypass_tables && options.ignore_anchors);
    }

    #[test]
    fn test_apply_options_unwraps_markup() {
        let rewritten = apply_options(PAGE, &ConvertOptions::default()).unwrap();
        assert!(rewritten.contains("First bold words with a link."));
        assert!(!rewritten.contains("<img"));
        assert!(!rewritten.contains("href"));
    }

    #[test]
    fn test_apply_options_keeps_links_when_enabled() {
        let options = ConvertOptions { ignore_links: false, ignore_anchors: true, ..Default::default() };
        let html = r##"<p><a href="#top">Top</a> and <a href="https://example.com">out</a></p>"##;
        let rewritten = apply_options(html, &options).unwrap();
        assert!(!rewritten.contains("#top"));
        assert!(rewritten.contains("https://example.com"));
    }

    #[test]
    fn test_apply_options_flattens_tables() {
        let html = "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>";
        let rewritten = apply_options(html, &ConvertOptions::default()).unwrap();
        assert!(rewritten.contains("<p>a b"));
        assert!(rewritten.contains("<p>c"));
        assert!(!rewritten.contains("<td"));
        assert!(!rewritten.contains("<table"));
    }

    #[cfg(feature = "markdown")]
    #[test]
    fn test_markdown_converter_plain_output() {
        let text = MarkdownTextConverter::default().convert(PAGE).unwrap();
        assert!(text.contains("First bold words with a link."));
        assert!(text.contains("Second paragraph."));
        assert!(!text.contains("**"));
        assert!(!text.contains("Head Title"));
        assert!(!text.contains("tracked"));
        assert!(!text.contains("https://example.com/x"));
    }

    #[cfg(feature = "markdown")]
    #[test]
    fn test_markdown_converter_removes_escapes() {
        let html = "<p>The snake_case word *star* term uses [brackets] in 1999.</p><p>1. Numbered start term.</p>";
        let text = MarkdownTextConverter::default().convert(html).unwrap();

        assert!(!text.contains('\\'), "{text:?}");
        assert!(text.contains("The snake_case word *star* term uses [brackets] in 1999."), "{text:?}");
        assert!(text.contains("1. Numbered start term."), "{text:?}");
    }

    #[test]
    fn test_dom_converter_drops_head_script_comments() {
        let html = r#"<html><head><title>Nope</title></head><body>
<p>Hello</p><script>alert("x")</script>
<div class="thread comments"><p>spam one</p></div>
<section id="comments"><p>spam two</p></section>
<p>World</p></body></html>"#;
        let text = DomTextConverter.convert(html).unwrap();

        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert!(!text.contains("Nope"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("spam"));
    }

    #[test]
    fn test_dom_converter_collapses_blank_runs() {
        let html = "<html><body><p>a</p>\n\n\n\n<p>b</p>\n<p>c</p></body></html>";
        let text = DomTextConverter.convert(html).unwrap();

        assert!(text.contains("a\n\nb"));
        assert!(text.contains("b\n\nc"));
        assert!(!text.contains("\n\n\n"));
    }

    #[test]
    fn test_dom_converter_separates_minified_blocks() {
        let html = "<html><body><p>The gazebo stood in the garden.</p><p>Every summer it was painted.</p>\
                    <ul><li>one</li><li>two</li></ul>first<br>second</body></html>";
        let text = DomTextConverter.convert(html).unwrap();

        assert!(text.contains("garden.\nEvery summer"), "{text:?}");
        assert!(text.contains("one\ntwo"), "{text:?}");
        assert!(text.contains("first\nsecond"), "{text:?}");
    }

    #[test]
    fn test_dom_converter_keeps_inline_text_together() {
        let html = "<html><body><p>A <b>bold</b> <span>inline</span> run.</p></body></html>";
        let text = DomTextConverter.convert(html).unwrap();
        assert!(text.contains("A bold inline run."), "{text:?}");
    }

    #[test]
    fn test_html_to_text_uses_fallback() {
        let html = "<html><head><title>T</title></head><body><p>Fallback body</p></body></html>";
        let text = html_to_text(html, &FailingConverter, "https://example.com").unwrap();
        assert_eq!(text, DomTextConverter.convert(html).unwrap());
        assert!(text.contains("Fallback body"));
    }

    #[cfg(feature = "markdown")]
    #[test]
    fn test_html_to_text_prefers_primary() {
        let html = "<p>Primary <em>path</em></p>";
        let text = html_to_text(html, &MarkdownTextConverter::default(), "https://example.com").unwrap();
        assert_eq!(text.trim(), "Primary path");
    }
}
