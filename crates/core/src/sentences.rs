//! Term-bearing sentence extraction shared by both backends.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::preprocess::Preprocessor;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("hardcoded regex pattern is valid"));

/// A retained sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// The sentence as it appeared in the page text.
    #[serde(rename = "s")]
    pub original: String,
    /// Cleaned form used for deduplication.
    #[serde(rename = "s_clean")]
    pub normalized: String,
}

/// Result of scanning a page's text for a term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceExtraction {
    /// Space-joined original text of the retained sentences.
    pub doc: String,
    /// Retained sentences, in document order, unique by normalized form.
    pub sentences: Vec<Sentence>,
    /// Every spelling of the term seen in a retained sentence.
    pub variants: BTreeSet<String>,
}

/// Finds the sentences of `text` that mention `term` or one of its variants.
///
/// Paragraphs outside the target language are skipped before segmentation.
/// A sentence is dropped when cleaning finds no variant in it, or when its
/// normalized form was already retained.
pub fn extract_sentences(text: &str, term: &str, preprocessor: &dyn Preprocessor) -> SentenceExtraction {
    let mut seen = HashSet::new();
    let mut extraction = SentenceExtraction::default();

    let paragraphs = PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .filter(|p| preprocessor.is_target_language(p));

    for paragraph in paragraphs {
        for sentence in preprocessor.paragraph_to_sentences(paragraph, term) {
            if !preprocessor.qualifies(&sentence) {
                continue;
            }

            let (normalized, variants) = preprocessor.clean(&sentence, term);
            if variants.is_empty() || !seen.insert(normalized.clone()) {
                continue;
            }

            extraction.variants.extend(variants);
            extraction.sentences.push(Sentence { original: sentence, normalized });
        }
    }

    extraction.doc = extraction
        .sentences
        .iter()
        .map(|s| s.original.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    tracing::debug!(
        term,
        sentences = extraction.sentences.len(),
        variants = extraction.variants.len(),
        "extracted sentences"
    );

    extraction
}
