use std::sync::Arc;

use reqwest::blocking::Client;

use super::{Extractor, scan_page, source_of};
use crate::Result;
use crate::config::SerapisConfig;
use crate::convert::{MarkdownTextConverter, TextConverter, html_to_text};
use crate::fetch::{build_client, fetch_with_retry};
use crate::metadata::extract_meta;
use crate::preprocess::{BasicPreprocessor, Preprocessor};
use crate::record::{ExtractionRequest, Record};

/// Fetches the page itself and converts it to text locally.
///
/// ```rust,no_run
/// use serapis_core::{DirectFetchExtractor, Extractor, SerapisConfig};
///
/// let extractor = DirectFetchExtractor::new(SerapisConfig::default())?;
/// if let Some(record) = extractor.request("https://example.com/post", "serendipity") {
///     println!("{} sentences", record.sentences.len());
/// }
/// # Ok::<(), serapis_core::SerapisError>(())
/// ```
pub struct DirectFetchExtractor {
    config: SerapisConfig,
    client: Client,
    converter: Box<dyn TextConverter>,
    preprocessor: Arc<dyn Preprocessor>,
}

impl DirectFetchExtractor {
    /// Creates an extractor with the markdown converter and the basic preprocessor.
    pub fn new(config: SerapisConfig) -> Result<Self> {
        let client = build_client(&config.fetch_config())?;
        Ok(Self {
            config,
            client,
            converter: Box::new(MarkdownTextConverter::default()),
            preprocessor: Arc::new(BasicPreprocessor::new()),
        })
    }

    /// Replaces the primary HTML to text converter.
    pub fn with_converter(mut self, converter: impl TextConverter + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }

    pub fn with_preprocessor(mut self, preprocessor: Arc<dyn Preprocessor>) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn config(&self) -> &SerapisConfig {
        &self.config
    }

    /// Builds a record from already fetched markup.
    ///
    /// This is the deterministic part of the pipeline: the same markup, term
    /// and configuration always give the same record.
    pub fn parse_html(&self, request: &ExtractionRequest, html: &str) -> Result<Record> {
        let text = html_to_text(html, self.converter.as_ref(), request.url())?;
        let (extraction, features) = scan_page(&text, html, request.term(), self.preprocessor.as_ref());
        let meta = extract_meta(html);
        let source = source_of(request, self.preprocessor.as_ref());
        let saved = self.config.save_html.then(|| html.to_string());

        let doc = extraction.doc.clone();
        Ok(Record::assemble(request, source, doc, extraction, features, meta, saved))
    }
}

impl Extractor for DirectFetchExtractor {
    fn extract(&self, request: &ExtractionRequest) -> Option<Record> {
        let response = fetch_with_retry(
            &self.client,
            request.url(),
            self.config.request_timeout_seconds,
            self.config.request_retry,
            self.config.retry_delay(),
        )?;

        match self.parse_html(request, &response.body) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::error!(url = request.url(), error = %err, "Failed to parse page for url: {}", request.url());
                None
            }
        }
    }
}
