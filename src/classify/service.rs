use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::cache::{ClassificationCache, cache_key};
use super::error::{ClassifyError, ClassifyResult};
use super::parser::{ClassificationResult, parse_classification_result};
use super::prompt::DEFAULT_VISION_PROMPT;
use crate::constants::DEFAULT_MAX_DOWNLOAD_BYTES;
use crate::events::{ClassificationEvent, DecisionSource, Diagnostics};
use crate::transport::{DownloadOptions, ImageFetcher, encode_data_url};

/// One image handed to the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// `data:` URI or plain HTTP URL.
    pub url: String,
    pub mime_type: String,
}

impl ImageInput {
    pub fn from_bytes(data: &[u8], mime_type: &str) -> Self {
        Self {
            url: encode_data_url(data, mime_type),
            mime_type: mime_type.to_string(),
        }
    }
}

/// Multimodal model call: returns the raw text answer.
#[async_trait]
pub trait VisionClassifier: Send + Sync {
    async fn classify(&self, prompt: &str, images: &[ImageInput]) -> ClassifyResult<String>;
}

/// Classification front end: prompt selection, caching, graceful degradation and
/// the `model` audit event.
///
/// Every failure (no model configured, no image bytes, model error) yields the
/// empty [`ClassificationResult`], which callers treat as acceptance.
#[derive(Clone)]
pub struct ImageClassifier {
    model: Option<Arc<dyn VisionClassifier>>,
    cache: Option<Arc<dyn ClassificationCache>>,
    fetcher: Option<Arc<dyn ImageFetcher>>,
    prompt: String,
    diagnostics: Diagnostics,
}

impl ImageClassifier {
    pub fn new(model: Arc<dyn VisionClassifier>) -> Self {
        Self::from_optional(Some(model))
    }

    /// `None` behaves like [`disabled`](Self::disabled).
    pub fn from_optional(model: Option<Arc<dyn VisionClassifier>>) -> Self {
        Self {
            model,
            cache: None,
            fetcher: None,
            prompt: DEFAULT_VISION_PROMPT.to_string(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// A classifier with no model: every call returns the empty result.
    pub fn disabled() -> Self {
        Self::from_optional(None)
    }

    pub fn with_cache(mut self, cache: Arc<dyn ClassificationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fetcher used by [`classify_url`](Self::classify_url) for the preview download.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn ImageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Overrides the default prompt; blank prompts are ignored.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        if !prompt.trim().is_empty() {
            self.prompt = prompt;
        }
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Classifies already downloaded bytes.
    pub async fn classify_bytes(
        &self,
        url: &str,
        data: &[u8],
        mime_type: &str,
    ) -> ClassificationResult {
        let Some(model) = &self.model else {
            return ClassificationResult::default();
        };

        let key = cache_key(url);
        if let Some(hit) = self.cached(&key).await {
            return hit;
        }

        match self.ask_model(model.as_ref(), url, data, mime_type).await {
            Ok(result) => {
                if !result.is_empty() {
                    self.store(&key, &result).await;
                }
                result
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Vision model unavailable, accepting");
                ClassificationResult::default()
            }
        }
    }

    /// Downloads a preview of `url` and classifies it.
    pub async fn classify_url(&self, url: &str) -> ClassificationResult {
        let Some(model) = &self.model else {
            return ClassificationResult::default();
        };

        let key = cache_key(url);
        if let Some(hit) = self.cached(&key).await {
            return hit;
        }

        let Some(fetcher) = &self.fetcher else {
            debug!(url = %url, "No fetcher for preview download, accepting");
            return ClassificationResult::default();
        };

        let options = DownloadOptions::default().with_max_bytes(DEFAULT_MAX_DOWNLOAD_BYTES);
        let preview = match fetcher.download(url, &options).await {
            Ok(preview) => preview,
            Err(e) => {
                debug!(url = %url, error = %e, "Preview download failed, accepting");
                return ClassificationResult::default();
            }
        };

        match self
            .ask_model(model.as_ref(), url, &preview.data, &preview.mime_type)
            .await
        {
            Ok(result) => {
                if !result.is_empty() {
                    self.store(&key, &result).await;
                }
                result
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Vision model unavailable, accepting");
                ClassificationResult::default()
            }
        }
    }

    /// True for PHOTO and for the empty result.
    pub async fn is_real_photo(&self, url: &str) -> bool {
        self.classify_url(url).await.is_real_photo()
    }

    async fn ask_model(
        &self,
        model: &dyn VisionClassifier,
        url: &str,
        data: &[u8],
        mime_type: &str,
    ) -> ClassifyResult<ClassificationResult> {
        if data.is_empty() {
            return Err(ClassifyError::NoImage);
        }

        let images = [ImageInput::from_bytes(data, mime_type)];
        let response = model.classify(&self.prompt, &images).await?;
        debug!(url = %url, response = %response.trim(), "Vision model answered");

        let result = parse_classification_result(&response);
        self.diagnostics.classification(ClassificationEvent::new(
            url,
            result.class.as_str(),
            result.confidence,
            DecisionSource::Model,
        ));

        Ok(result)
    }

    async fn cached(&self, key: &str) -> Option<ClassificationResult> {
        let cache = self.cache.as_ref()?;
        let hit = cache.get(key).await;
        if hit.is_some() {
            debug!(key = %key, "Classification cache hit");
        }
        hit
    }

    async fn store(&self, key: &str, result: &ClassificationResult) {
        if let Some(cache) = &self.cache {
            cache.set(key, result.clone()).await;
        }
    }
}

impl std::fmt::Debug for ImageClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageClassifier")
            .field("model", &self.model.is_some())
            .field("cache", &self.cache.is_some())
            .field("fetcher", &self.fetcher.is_some())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}
