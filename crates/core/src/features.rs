//! Presentation features of a term in raw page markup.
//!
//! Both the markup and the term are squashed first so whitespace and
//! attribute formatting cannot defeat the match. The checks are regex
//! approximations over markup, not a DOM walk.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::preprocess::squash;

/// Characters kept in the squashed markup: tag structure, entity delimiters,
/// and the quotation glyphs matched by the quote check.
const MARKUP_KEEP: &str = "<>/&;#\"'“”‘’«»‹›„‚";

/// A kept glyph or character entity that may sit around or inside the term,
/// as in `don't`, `C#` or `Macy&rsquo;s`.
const TERM_GLUE: &str = r#"(?:[#"'“”‘’«»‹›„‚]|&#?[a-z0-9]+;)?"#;

/// Tags treated as emphasis.
pub const HIGHLIGHT_TAGS: [&str; 5] = ["em", "i", "b", "strong", "span"];

/// Opening quotation glyphs in literal, named-entity and numeric-entity form.
pub const OPENING_QUOTES: [&str; 24] = [
    "\"", "'", "&quot;", "&#34;", "“", "&ldquo;", "&#8220;", "‘", "&lsquo;", "&#8216;", "«", "&laquo;", "&#171;", "‹",
    "&lsaquo;", "&#8249;", "„", "&bdquo;", "&#8222;", "‚", "&sbquo;", "&#8218;", "&#39;", "&apos;",
];

/// Closing quotation glyphs. Low quotes close with the high opening glyphs in
/// German-style typography, so `“` and `‘` appear here as well.
pub const CLOSING_QUOTES: [&str; 22] = [
    "\"", "'", "&quot;", "&#34;", "&#39;", "&apos;", "”", "&rdquo;", "&#8221;", "’", "&rsquo;", "&#8217;", "»",
    "&raquo;", "&#187;", "›", "&rsaquo;", "&#8250;", "“", "&ldquo;", "‘", "&lsquo;",
];

/// How a term is presented in the page markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    /// The term is the whole content of an emphasis tag.
    pub highlighted: bool,
    /// The term is the whole content of a tag, wrapped in quotation glyphs.
    pub quotes: bool,
}

/// Detects emphasis and quotation of `term` in `html`.
///
/// Returns `None` when the term is blank.
///
/// ```rust
/// use serapis_core::detect_features;
///
/// let features = detect_features("<p>A <b>Term</b> here</p>", "Term").unwrap();
/// assert!(features.highlighted);
/// assert!(!features.quotes);
/// assert!(detect_features("<b>x</b>", "  ").is_none());
/// ```
pub fn detect_features(html: &str, term: &str) -> Option<Features> {
    let minimal_term = squash(term, "");
    if minimal_term.is_empty() {
        return None;
    }

    let minimal_html = squash(html, MARKUP_KEEP);
    let term = term_pattern(&minimal_term);

    Some(Features {
        highlighted: highlight_regex(&term).is_some_and(|re| re.is_match(&minimal_html)),
        quotes: quote_regex(&term).is_some_and(|re| re.is_match(&minimal_html)),
    })
}

/// The squashed term with [`TERM_GLUE`] before, between and after its characters.
fn term_pattern(minimal_term: &str) -> String {
    minimal_term.chars().fold(TERM_GLUE.to_string(), |mut pattern, c| {
        pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
        pattern.push_str(TERM_GLUE);
        pattern
    })
}

/// One alternative per tag, since the opening and closing tag must agree.
fn highlight_regex(term: &str) -> Option<Regex> {
    let alternatives = HIGHLIGHT_TAGS
        .iter()
        .map(|tag| format!("<{tag}[^>]*> *{term}[ ,:]*</{tag}>"))
        .collect::<Vec<_>>()
        .join("|");

    build_case_insensitive(&alternatives)
}

/// Opening and closing glyphs are matched independently, so mismatched pairs pass.
fn quote_regex(term: &str) -> Option<Regex> {
    let opening = glyph_alternation(&OPENING_QUOTES);
    let closing = glyph_alternation(&CLOSING_QUOTES);
    let pattern = format!("<[a-z][a-z0-9]*[^>]*> *(?:{opening}){term}[ ,:]*(?:{closing})[ ,:]*</[a-z][a-z0-9]*>");

    build_case_insensitive(&pattern)
}

fn glyph_alternation(glyphs: &[&str]) -> String {
    glyphs.iter().map(|g| regex::escape(g)).collect::<Vec<_>>().join("|")
}

fn build_case_insensitive(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern).case_insensitive(true).build().ok()
}
