//! Top-level entry point: search, filter, sort and validate in one call.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::candidate::Candidate;
use crate::classify::{ClassificationCache, ImageClassifier, MokaClassificationCache, VisionClassifier};
use crate::config::{Config, ConfigError};
use crate::events::Diagnostics;
use crate::metadata::{MetadataExtractor, XmpPacketExtractor};
use crate::pipeline::CandidateValidator;
use crate::search::{
    SearchError, SearchOptions, SearchProvider, SearxngProvider, rank_candidates, search_all,
};
use crate::transport::{FetchError, HttpImageFetcher, ImageFetcher};

#[derive(Error, Debug)]
pub enum CuratorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Assembles an [`ImageCurator`] from a [`Config`] plus optional collaborators.
///
/// Anything not injected is built from the config: a [`SearxngProvider`] when a
/// SearXNG URL is set, an [`HttpImageFetcher`], a moka-backed classification
/// cache and the XMP metadata extractor.
#[derive(Default)]
pub struct CuratorBuilder {
    config: Config,
    providers: Vec<Arc<dyn SearchProvider>>,
    fetcher: Option<Arc<dyn ImageFetcher>>,
    model: Option<Arc<dyn VisionClassifier>>,
    cache: Option<Arc<dyn ClassificationCache>>,
    extractor: Option<Arc<dyn MetadataExtractor>>,
    diagnostics: Diagnostics,
}

impl CuratorBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Adds a provider; providers are queried in the order added.
    pub fn provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn ImageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn vision_model(mut self, model: Arc<dyn VisionClassifier>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn classification_cache(mut self, cache: Arc<dyn ClassificationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn metadata_extractor(mut self, extractor: Arc<dyn MetadataExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn build(self) -> Result<ImageCurator, CuratorError> {
        self.config.validate()?;
        let config = self.config.normalized();

        let mut providers = self.providers;
        if let Some(url) = &config.searxng_url {
            providers.push(Arc::new(SearxngProvider::new(url.as_str())?));
        }
        if providers.is_empty() {
            return Err(SearchError::NoProvider.into());
        }

        let fetcher: Arc<dyn ImageFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpImageFetcher::from_config(&config)?),
        };

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(MokaClassificationCache::new()));
        let mut classifier = ImageClassifier::from_optional(self.model)
            .with_cache(cache)
            .with_fetcher(Arc::clone(&fetcher))
            .with_diagnostics(self.diagnostics.clone());
        if let Some(prompt) = &config.vision_prompt {
            classifier = classifier.with_prompt(prompt.as_str());
        }

        let extractor = self
            .extractor
            .unwrap_or_else(|| Arc::new(XmpPacketExtractor::new()));

        let validator = CandidateValidator::new(Arc::clone(&fetcher))
            .with_config(&config)
            .with_extractor(extractor)
            .with_classifier(classifier.clone())
            .with_diagnostics(self.diagnostics.clone());

        Ok(ImageCurator {
            providers,
            validator,
            classifier,
            diagnostics: self.diagnostics,
            search_timeout: config.search_timeout,
        })
    }
}

/// Finds license-cleared, deduplicated, class-verified photos for a query.
#[derive(Clone)]
pub struct ImageCurator {
    providers: Vec<Arc<dyn SearchProvider>>,
    validator: CandidateValidator,
    classifier: ImageClassifier,
    diagnostics: Diagnostics,
    search_timeout: Duration,
}

impl ImageCurator {
    pub fn builder(config: Config) -> CuratorBuilder {
        CuratorBuilder::new(config)
    }

    /// Curator with only config-built collaborators (needs a SearXNG URL).
    pub fn from_config(config: Config) -> Result<Self, CuratorError> {
        CuratorBuilder::new(config).build()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// The classifier used for Unknown-license candidates, for standalone checks.
    pub fn classifier(&self) -> &ImageClassifier {
        &self.classifier
    }

    pub async fn search_images(&self, query: &str, max_results: usize) -> Vec<Candidate> {
        self.search_images_with(query, max_results, SearchOptions::default())
            .await
    }

    /// Searches all providers and validates the merged hits.
    ///
    /// Search and validation share one deadline (`options.timeout`, else the
    /// configured search timeout). Provider failures and an expired deadline
    /// yield whatever was accepted so far, possibly nothing.
    pub async fn search_images_with(
        &self,
        query: &str,
        max_results: usize,
        options: SearchOptions,
    ) -> Vec<Candidate> {
        let query = query.trim();
        if query.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let run_id = Uuid::new_v4();
        let span = info_span!("search_images", %run_id, query = %query, max_results);
        self.run(query, max_results, options).instrument(span).await
    }

    async fn run(&self, query: &str, max_results: usize, mut options: SearchOptions) -> Vec<Candidate> {
        self.diagnostics.image_search(query);

        if options.timeout.is_zero() {
            options.timeout = self.search_timeout;
        }
        let deadline = Instant::now() + options.timeout;

        let hits = match tokio::time::timeout_at(
            deadline,
            search_all(&self.providers, query, &options),
        )
        .await
        {
            Ok(Ok(hits)) => hits,
            Ok(Err(e)) => {
                warn!(error = %e, "Image search failed");
                return Vec::new();
            }
            Err(_) => {
                warn!(timeout = ?options.timeout, "Image search timed out");
                return Vec::new();
            }
        };

        let raw = hits.len();
        let candidates = rank_candidates(hits);
        debug!(raw, kept = candidates.len(), "Search hits filtered");
        if candidates.is_empty() {
            return Vec::new();
        }

        let accepted = self
            .validator
            .validate_until(candidates, max_results, Some(deadline))
            .await;
        info!(accepted = accepted.len(), "Image search finished");
        accepted
    }
}

impl std::fmt::Debug for ImageCurator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCurator")
            .field("providers", &self.provider_names())
            .field("validator", &self.validator)
            .field("search_timeout", &self.search_timeout)
            .finish()
    }
}
