//! Extraction backends.
//!
//! Both backends turn a `(url, term)` pair into the same [`Record`] shape and
//! share the sentence and feature scan below. Failures never leave an
//! extractor: they are logged once and reported as `None`.

mod article_api;
mod direct;

use std::fmt;

pub use article_api::ArticleApiExtractor;
pub use direct::DirectFetchExtractor;

use crate::features::{Features, detect_features};
use crate::preprocess::Preprocessor;
use crate::record::{ExtractionRequest, Record};
use crate::sentences::{SentenceExtraction, extract_sentences};

/// A strategy that produces one record per page and term.
pub trait Extractor: Send + Sync {
    /// Runs the extraction, returning `None` if no usable record was produced.
    fn extract(&self, request: &ExtractionRequest) -> Option<Record>;

    /// Convenience wrapper building the request from its parts.
    fn request(&self, url: &str, term: &str) -> Option<Record> {
        self.extract(&ExtractionRequest::new(url, term))
    }
}

/// Progress of an article API call. Failures name the last stage reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStage {
    Requested,
    Received,
    Validated,
    Extracted,
}

impl fmt::Display for ApiStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiStage::Requested => "requested",
            ApiStage::Received => "received",
            ApiStage::Validated => "validated",
            ApiStage::Extracted => "extracted",
        };
        f.write_str(name)
    }
}

/// Sentence scan over `text` and feature scan over `html`.
pub(crate) fn scan_page(
    text: &str, html: &str, term: &str, preprocessor: &dyn Preprocessor,
) -> (SentenceExtraction, Option<Features>) {
    let extraction = extract_sentences(text, term, preprocessor);
    let features = detect_features(html, term);
    (extraction, features)
}

/// Source name for the request's URL.
pub(crate) fn source_of(request: &ExtractionRequest, preprocessor: &dyn Preprocessor) -> String {
    preprocessor.source_from_url(request.url())
}
