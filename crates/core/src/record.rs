//! Request and output record types.
//!
//! A [`Record`] is the single output of one `(url, term)` extraction. Both
//! backends assemble the same shape; only where the fields come from differs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::features::Features;
use crate::metadata::Meta;
use crate::sentences::{Sentence, SentenceExtraction};

/// One page to scan for one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    url: String,
    term: String,
}

impl ExtractionRequest {
    pub fn new(url: impl Into<String>, term: impl Into<String>) -> Self {
        Self { url: url.into(), term: term.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

/// Structured result of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub term: String,
    pub url: String,

    /// Short source name derived from the URL.
    pub source: String,

    /// Page text made of the retained sentences (direct fetch) or the article
    /// text returned by the API.
    pub doc: String,

    /// Presentation features; absent when the term is blank.
    pub features: Option<Features>,

    /// Spellings of the term found in retained sentences, serialized as a list.
    pub variants: BTreeSet<String>,

    pub sentences: Vec<Sentence>,
    pub author: Option<String>,
    pub title: Option<String>,

    /// Page markup, kept only when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Record {
    /// Assembles a record from the pieces produced by the pipeline.
    pub(crate) fn assemble(
        request: &ExtractionRequest, source: String, doc: String, extraction: SentenceExtraction,
        features: Option<Features>, meta: Meta, html: Option<String>,
    ) -> Self {
        Self {
            term: request.term().to_string(),
            url: request.url().to_string(),
            source,
            doc,
            features,
            variants: extraction.variants,
            sentences: extraction.sentences,
            author: meta.author,
            title: meta.title,
            html,
        }
    }

    /// Gets the record as structured JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(html: Option<String>) -> Record {
        let extraction = SentenceExtraction {
            doc: "A term here.".to_string(),
            sentences: vec![Sentence { original: "A term here.".to_string(), normalized: "a term here".to_string() }],
            variants: BTreeSet::from(["terms".to_string(), "Term".to_string()]),
        };
        let request = ExtractionRequest::new("https://www.example.com/a", "term");
        let meta = Meta { title: Some("Title".to_string()), author: None };

        Record::assemble(
            &request,
            "example.com".to_string(),
            extraction.doc.clone(),
            extraction,
            Some(Features { highlighted: true, quotes: false }),
            meta,
            html,
        )
    }

    #[test]
    fn test_request_accessors() {
        let request = ExtractionRequest::new("https://example.com", "serendipity");
        assert_eq!(request.url(), "https://example.com");
        assert_eq!(request.term(), "serendipity");
    }

    #[test]
    fn test_record_serialization() {
        let json = sample_record(None).to_json().unwrap();

        assert_eq!(json["term"], "term");
        assert_eq!(json["source"], "example.com");
        assert_eq!(json["doc"], "A term here.");
        assert_eq!(json["features"]["highlighted"], true);
        assert_eq!(json["variants"], serde_json::json!(["Term", "terms"]));
        assert_eq!(json["sentences"][0]["s_clean"], "a term here");
        assert_eq!(json["title"], "Title");
        assert!(json["author"].is_null());
        assert!(json.get("html").is_none());
    }

    #[test]
    fn test_record_keeps_html_when_given() {
        let json = sample_record(Some("<p>A term here.</p>".to_string())).to_json().unwrap();
        assert_eq!(json["html"], "<p>A term here.</p>");
    }
}
