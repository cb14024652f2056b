//! Author and title scraped from raw page markup.
//!
//! Lookups are regex approximations over `<meta>` and `<title>` tags.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<\s*meta\b[^>]*>").expect("hardcoded regex pattern is valid"));

static META_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("hardcoded regex pattern is valid")
});

static TITLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<\s*title\b[^>]*>([^<]*)<\s*/\s*title\s*>").expect("hardcoded regex pattern is valid")
});

/// Attribute/value pairs that mark an author `<meta>` tag, in priority order:
/// W3C, OpenGraph, then article meta.
const AUTHOR_CONVENTIONS: [(&str, &str); 3] =
    [("name", "author"), ("property", "og:author"), ("property", "article:author")];

static AUTHOR_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    AUTHOR_CONVENTIONS
        .iter()
        .map(|(attr, value)| {
            Regex::new(&format!(r#"(?i)\b{attr}\s*=\s*["']?{}(?:["'\s/>]|$)"#, regex::escape(value)))
                .expect("hardcoded regex pattern is valid")
        })
        .collect()
});

/// Page metadata scraped from markup or supplied by the article API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Scrape title and author from raw markup.
///
/// This is a regex approximation, not a DOM-aware extraction.
pub fn extract_meta(html: &str) -> Meta {
    Meta { title: extract_title(html), author: extract_author(html) }
}

/// First author `<meta>` value that is non-empty and not a URL.
///
/// Candidates are ordered by convention, then by position in the document.
pub fn extract_author(html: &str) -> Option<String> {
    let tags: Vec<&str> = META_TAG.find_iter(html).map(|m| m.as_str()).collect();

    AUTHOR_MARKERS
        .iter()
        .flat_map(|marker| tags.iter().filter(move |tag| marker.is_match(tag)))
        .filter_map(|tag| meta_content(tag))
        .find(|author| !author.is_empty() && !looks_like_url(author))
}

/// Trimmed text of the first `<title>` element. Empty titles count as absent.
pub fn extract_title(html: &str) -> Option<String> {
    TITLE_TAG
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
}

fn meta_content(tag: &str) -> Option<String> {
    let caps = META_CONTENT.captures(tag)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().trim().to_string())
}

fn looks_like_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
