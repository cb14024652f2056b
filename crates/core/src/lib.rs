pub mod config;
pub mod convert;
pub mod error;
pub mod extractors;
pub mod features;
pub mod fetch;
pub mod metadata;
pub mod preprocess;
pub mod record;
pub mod sentences;

pub use config::{Credentials, DEFAULT_ARTICLE_API_ENDPOINT, SerapisConfig, SerapisConfigBuilder};
pub use convert::{ConvertOptions, DomTextConverter, MarkdownTextConverter, TextConverter, html_to_text};
pub use error::{Result, SerapisError};
pub use extractors::{ApiStage, ArticleApiExtractor, DirectFetchExtractor, Extractor};
pub use features::{Features, detect_features};
pub use fetch::{FetchConfig, RawResponse, fetch_with_retry, read_html_source};
pub use metadata::{Meta, extract_author, extract_meta, extract_title};
pub use preprocess::{BasicPreprocessor, Preprocessor, source_from_url, squash};
pub use record::{ExtractionRequest, Record};
#[doc(hidden)]
pub use sentences::{Sentence, SentenceExtraction, extract_sentences};
