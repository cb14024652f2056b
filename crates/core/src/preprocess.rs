//! Sentence preprocessing: language checks, segmentation, qualification and
//! cleaning.
//!
//! The extraction pipeline only talks to the [`Preprocessor`] trait. The
//! [`BasicPreprocessor`] is a lightweight English implementation; callers with
//! better language models plug in their own.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}'’]+").expect("hardcoded regex pattern is valid"));

/// Sentence terminators plus any closing quotes/brackets and trailing space.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?…]+["'”’)\]]*(?:\s+|$)"#).expect("hardcoded regex pattern is valid"));

/// Markdown block markers left at the start of rendered lines.
static LINE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:#{1,6}|>|[*+\-]|\d+\.)[ \t]+").expect("hardcoded regex pattern is valid"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("hardcoded regex pattern is valid"));

const STOPWORDS: [&str; 40] = [
    "the", "a", "an", "and", "or", "but", "of", "to", "in", "on", "at", "by", "for", "with", "from", "as", "is", "are",
    "was", "were", "be", "been", "it", "its", "this", "that", "these", "those", "he", "she", "they", "we", "you", "i",
    "not", "have", "has", "had", "which", "who",
];

/// Lowercases `text` and drops every character that is neither alphanumeric
/// nor listed in `keep`.
///
/// ```rust
/// use serapis_core::squash;
///
/// assert_eq!(squash("New York!", ""), "newyork");
/// assert_eq!(squash("<b> Hi </b>", "<>/"), "<b>hi</b>");
/// ```
pub fn squash(text: &str, keep: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || keep.contains(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Text-level collaborators of the extraction pipeline.
pub trait Preprocessor: Send + Sync {
    /// Whether the paragraph is in the pipeline's target language.
    fn is_target_language(&self, paragraph: &str) -> bool;

    /// Candidate sentences of `paragraph` that mention `term`.
    fn paragraph_to_sentences(&self, paragraph: &str, term: &str) -> Vec<String>;

    /// Whether a sentence meets the minimum quality bar.
    fn qualifies(&self, sentence: &str) -> bool;

    /// Normalized form of `sentence` and the spellings of `term` found in it.
    fn clean(&self, sentence: &str, term: &str) -> (String, BTreeSet<String>);

    /// Short source name for a page URL.
    fn source_from_url(&self, url: &str) -> String {
        source_from_url(url)
    }
}

/// Host name of `url` without a leading `www.`. Unparseable URLs are returned trimmed.
pub fn source_from_url(url: &str) -> String {
    match Url::parse(url.trim()).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
        Some(host) => host.strip_prefix("www.").map(str::to_string).unwrap_or(host),
        None => url.trim().to_string(),
    }
}

/// Regex matching spellings of `term`: any casing, an optional hyphen, space,
/// apostrophe or period between characters, and a plural or possessive ending.
pub fn variant_pattern(term: &str) -> Option<Regex> {
    let squashed = squash(term, "");
    if squashed.is_empty() {
        return None;
    }

    let body = squashed
        .chars()
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(r"[\s\-'’.]?");

    Regex::new(&format!(r"(?i)\b{body}(?:es|s|'s|’s)?\b")).ok()
}

/// English-only preprocessor built on regular expressions.
#[derive(Debug, Clone)]
pub struct BasicPreprocessor {
    /// Minimum sentence length in characters (default: 20).
    pub min_chars: usize,
    /// Maximum sentence length in characters (default: 600).
    pub max_chars: usize,
    /// Minimum number of words (default: 4).
    pub min_words: usize,
    /// Minimum share of stopwords for paragraphs of six words or more (default: 0.08).
    pub min_stopword_ratio: f64,
}

impl Default for BasicPreprocessor {
    fn default() -> Self {
        Self { min_chars: 20, max_chars: 600, min_words: 4, min_stopword_ratio: 0.08 }
    }
}

impl BasicPreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn split_sentences(paragraph: &str) -> Vec<String> {
        let unmarked = LINE_MARKER.replace_all(paragraph, "");
        let flat = WHITESPACE.replace_all(unmarked.trim(), " ");

        let mut sentences = Vec::new();
        let mut start = 0;
        for end in SENTENCE_END.find_iter(&flat) {
            let sentence = flat[start..end.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end.end();
        }

        let rest = flat[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }

        sentences
    }
}

impl Preprocessor for BasicPreprocessor {
    fn is_target_language(&self, paragraph: &str) -> bool {
        let letters: Vec<char> = paragraph.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            return false;
        }

        let ascii = letters.iter().filter(|c| c.is_ascii()).count();
        if (ascii as f64) / (letters.len() as f64) < 0.9 {
            return false;
        }

        let words: Vec<String> = WORD.find_iter(paragraph).map(|m| m.as_str().to_lowercase()).collect();
        if words.len() < 6 {
            return true;
        }

        let stopwords = words.iter().filter(|w| STOPWORDS.contains(&w.as_str())).count();
        (stopwords as f64) / (words.len() as f64) >= self.min_stopword_ratio
    }

    fn paragraph_to_sentences(&self, paragraph: &str, term: &str) -> Vec<String> {
        let Some(pattern) = variant_pattern(term) else {
            return Vec::new();
        };

        Self::split_sentences(paragraph)
            .into_iter()
            .filter(|sentence| pattern.is_match(sentence))
            .collect()
    }

    fn qualifies(&self, sentence: &str) -> bool {
        let length = sentence.chars().count();
        if length < self.min_chars || length > self.max_chars {
            return false;
        }

        if WORD.find_iter(sentence).count() < self.min_words {
            return false;
        }

        if sentence.contains("http") || sentence.contains('|') || sentence.contains('{') || sentence.contains('}') {
            return false;
        }

        let starts_well = sentence
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase() || c.is_numeric() || "\"'“‘«".contains(c));
        let ends_well = sentence.chars().last().is_some_and(|c| ".!?…\"'”’)".contains(c));

        starts_well && ends_well
    }

    fn clean(&self, sentence: &str, term: &str) -> (String, BTreeSet<String>) {
        let mut variants = BTreeSet::new();
        let canonical = term.trim().to_lowercase();

        let replaced = match variant_pattern(term) {
            Some(pattern) => {
                variants.extend(pattern.find_iter(sentence).map(|m| m.as_str().to_string()));
                pattern.replace_all(sentence, canonical.as_str()).into_owned()
            }
            None => sentence.to_string(),
        };

        let stripped: String = replaced
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
            .collect();
        let normalized = WHITESPACE.replace_all(stripped.trim(), " ").into_owned();

        (normalized, variants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("E-mail", "", "email")]
    #[case("  Caf\u{e9} au lait ", "", "caf\u{e9}aulait")]
    #[case("<EM class=\"x\">Term</EM>", "<>/&;", "<emclassx>term</em>")]
    #[case("&ldquo;x&rdquo;", "<>/&;", "&ldquo;x&rdquo;")]
    fn test_squash(#[case] input: &str, #[case] keep: &str, #[case] expected: &str) {
        assert_eq!(squash(input, keep), expected);
    }

    #[rstest]
    #[case("https://www.nytimes.com/2015/story.html", "nytimes.com")]
    #[case("http://Blog.Example.org/post", "blog.example.org")]
    #[case("not a url", "not a url")]
    fn test_source_from_url(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(source_from_url(url), expected);
    }

    #[test]
    fn test_variant_pattern_spellings() {
        let pattern = variant_pattern("e-mail").unwrap();
        for text in ["email", "E-mail", "e mail", "emails", "E-Mail's"] {
            assert!(pattern.is_match(text), "{text} should match");
        }
        assert!(!pattern.is_match("gmail"));
        assert!(!pattern.is_match("emailing"));
    }

    #[test]
    fn test_variant_pattern_blank_term() {
        assert!(variant_pattern("  ").is_none());
        assert!(variant_pattern("--").is_none());
    }

    #[test]
    fn test_language_detection() {
        let pre = BasicPreprocessor::new();
        assert!(pre.is_target_language("The quick brown fox jumps over the lazy dog in the park."));
        assert!(pre.is_target_language("Short heading"));
        assert!(!pre.is_target_language("Съешь же ещё этих мягких французских булок, да выпей чаю."));
        assert!(!pre.is_target_language("1234 5678"));
    }

    #[test]
    fn test_paragraph_to_sentences_keeps_term_sentences() {
        let pre = BasicPreprocessor::new();
        let paragraph = "## Origins\nThe word serendipity is old. Nothing here mentions it!\nWas it Serendipity's fault?";
        let sentences = pre.paragraph_to_sentences(paragraph, "serendipity");

        assert_eq!(
            sentences,
            vec!["Origins The word serendipity is old.".to_string(), "Was it Serendipity's fault?".to_string()]
        );
    }

    #[rstest]
    #[case("The word serendipity was coined in 1754.", true)]
    #[case("too short.", false)]
    #[case("the sentence starts in lowercase letters.", false)]
    #[case("This sentence has no terminal punctuation", false)]
    #[case("See https://example.com for the serendipity page.", false)]
    #[case("Menu | Home | About | Serendipity | Contact.", false)]
    #[case("\u{201c}Serendipity is a happy accident,\u{201d}", true)]
    fn test_qualifies(#[case] sentence: &str, #[case] expected: bool) {
        assert_eq!(BasicPreprocessor::new().qualifies(sentence), expected);
    }

    #[test]
    fn test_clean_normalizes_and_collects_variants() {
        let pre = BasicPreprocessor::new();
        let (normalized, variants) = pre.clean("Send an E-mail, or two emails, today!", "email");

        assert_eq!(normalized, "send an email or two email today");
        assert_eq!(variants, BTreeSet::from(["E-mail".to_string(), "emails".to_string()]));
    }

    #[test]
    fn test_clean_equal_for_spelling_differences() {
        let pre = BasicPreprocessor::new();
        let (a, _) = pre.clean("I sent the e-mail.", "email");
        let (b, _) = pre.clean("I sent the Email!", "email");
        assert_eq!(a, b);
    }
}
