use std::sync::Arc;

use reqwest::blocking::Client;
use serde::Deserialize;

use super::{ApiStage, Extractor, scan_page, source_of};
use crate::config::SerapisConfig;
use crate::fetch::build_client;
use crate::metadata::Meta;
use crate::preprocess::{BasicPreprocessor, Preprocessor};
use crate::record::{ExtractionRequest, Record};
use crate::{Result, SerapisError};

#[derive(Debug, Deserialize)]
struct ApiResponse {
    objects: Option<Vec<ApiObject>>,
}

#[derive(Debug, Deserialize)]
struct ApiObject {
    text: Option<String>,
    html: Option<String>,
    author: Option<String>,
    title: Option<String>,
}

/// Lets a third-party article API fetch and clean the page.
///
/// Text, markup, author and title come from the API verbatim. Sentences,
/// variants and features are computed from the returned markup.
pub struct ArticleApiExtractor {
    config: SerapisConfig,
    client: Client,
    preprocessor: Arc<dyn Preprocessor>,
}

impl ArticleApiExtractor {
    pub fn new(config: SerapisConfig) -> Result<Self> {
        let client = build_client(&config.fetch_config())?;
        Ok(Self { config, client, preprocessor: Arc::new(BasicPreprocessor::new()) })
    }

    pub fn with_preprocessor(mut self, preprocessor: Arc<dyn Preprocessor>) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn config(&self) -> &SerapisConfig {
        &self.config
    }

    fn call_api(&self, url: &str) -> Result<ApiResponse> {
        let token = self
            .config
            .credentials
            .diffbot
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SerapisError::MissingCredential("diffbot"))?;

        let failed = |reason: String| SerapisError::ArticleApi { stage: ApiStage::Requested, reason };

        tracing::debug!(url, stage = %ApiStage::Requested, "calling article API");
        let response = self
            .client
            .get(&self.config.article_api_endpoint)
            .query(&[("token", token), ("url", url), ("mode", "article"), ("discussion", "false")])
            .send()
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP status {}", status.as_u16())));
        }

        response.json::<ApiResponse>().map_err(|e| failed(e.to_string()))
    }

    fn first_object(response: ApiResponse) -> Result<ApiObject> {
        response
            .objects
            .and_then(|objects| objects.into_iter().next())
            .ok_or_else(|| SerapisError::ArticleApi { stage: ApiStage::Received, reason: "empty objects".to_string() })
    }

    fn build_record(&self, request: &ExtractionRequest, object: ApiObject) -> Record {
        let html = object.html.unwrap_or_default();
        let text = object.text.unwrap_or_default();

        let (extraction, features) = scan_page(&html, &html, request.term(), self.preprocessor.as_ref());
        let meta = Meta { title: object.title, author: object.author };
        let source = source_of(request, self.preprocessor.as_ref());
        let saved = self.config.save_html.then_some(html);

        Record::assemble(request, source, text, extraction, features, meta, saved)
    }

    fn try_extract(&self, request: &ExtractionRequest) -> Result<Record> {
        let response = self.call_api(request.url())?;
        let object = Self::first_object(response)?;
        tracing::debug!(url = request.url(), stage = %ApiStage::Validated, "article API response accepted");

        let record = self.build_record(request, object);
        tracing::debug!(url = request.url(), stage = %ApiStage::Extracted, sentences = record.sentences.len(), "article extracted");
        Ok(record)
    }
}

impl Extractor for ArticleApiExtractor {
    fn extract(&self, request: &ExtractionRequest) -> Option<Record> {
        match self.try_extract(request) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::error!(url = request.url(), error = %err, "Failed to return page for url: {}", request.url());
                None
            }
        }
    }
}
