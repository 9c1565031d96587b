//! Bounded-concurrency candidate validation.
//!
//! Each candidate runs probe, single download, perceptual dedup, license
//! assessment and (for Unknown licenses only) vision classification, stopping at
//! the first failing stage. Workers are admitted through a semaphore sized to the
//! pool; the dispatcher stops once the quota is met but never cancels in-flight
//! workers.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use image::DynamicImage;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::error::{PipelineError, Rejection};
use super::results::ResultSet;
use super::stage::{Stage, StageTracker};
use crate::candidate::Candidate;
use crate::classify::{CLASS_PHOTO, CLASS_STOCK, ClassificationResult, ImageClassifier};
use crate::config::Config;
use crate::constants::{
    DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_MAX_DOWNLOAD_BYTES, DEFAULT_MIN_IMAGE_WIDTH,
    DEFAULT_VALIDATION_WORKERS,
};
use crate::dedup::DedupFilter;
use crate::events::{ClassificationEvent, DecisionSource, Diagnostics};
use crate::license::{ImageLicense, LicenseAssessment, LicenseAssessor};
use crate::metadata::MetadataExtractor;
use crate::transport::{DownloadOptions, DownloadResult, ImageFetcher};

/// Confidence attached to license-driven audit events.
const LICENSE_DECISION_CONFIDENCE: f64 = 1.0;

/// How an accepted candidate got through.
#[derive(Debug, Clone, PartialEq)]
pub enum Acceptance {
    /// Safe license; the model was never consulted.
    License,
    /// The model answered with a non-rejecting class.
    Classified(ClassificationResult),
    /// No classification signal (no model, model error, or no bytes).
    Unclassified,
}

#[derive(Clone)]
struct Stages {
    fetcher: Arc<dyn ImageFetcher>,
    extractor: Option<Arc<dyn MetadataExtractor>>,
    classifier: ImageClassifier,
    assessor: LicenseAssessor,
    diagnostics: Diagnostics,
    min_width: u32,
    download: DownloadOptions,
}

/// Turns a license-sorted candidate list into the validated result set.
///
/// Cloning is cheap; every run gets its own dedup filter and result set.
#[derive(Clone)]
pub struct CandidateValidator {
    stages: Arc<Stages>,
    workers: usize,
}

impl CandidateValidator {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            stages: Arc::new(Stages {
                fetcher,
                extractor: None,
                classifier: ImageClassifier::disabled(),
                assessor: LicenseAssessor::default(),
                diagnostics: Diagnostics::default(),
                min_width: DEFAULT_MIN_IMAGE_WIDTH,
                download: DownloadOptions::default()
                    .with_max_bytes(DEFAULT_MAX_DOWNLOAD_BYTES)
                    .with_timeout(DEFAULT_DOWNLOAD_TIMEOUT),
            }),
            workers: DEFAULT_VALIDATION_WORKERS,
        }
    }

    /// Applies width, download limits, extra domain lists and pool size from `config`.
    pub fn with_config(mut self, config: &Config) -> Self {
        let config = config.normalized();
        let stages = Arc::make_mut(&mut self.stages);
        stages.min_width = config.min_image_width;
        stages.download = DownloadOptions::default()
            .with_max_bytes(config.max_download_bytes)
            .with_timeout(config.download_timeout)
            .with_user_agent(config.user_agent.clone());
        stages.assessor = LicenseAssessor::new(
            config.extra_blocked_domains.clone(),
            config.extra_safe_domains.clone(),
        );
        self.workers = config.workers;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn MetadataExtractor>) -> Self {
        Arc::make_mut(&mut self.stages).extractor = Some(extractor);
        self
    }

    pub fn with_classifier(mut self, classifier: ImageClassifier) -> Self {
        Arc::make_mut(&mut self.stages).classifier = classifier;
        self
    }

    pub fn with_assessor(mut self, assessor: LicenseAssessor) -> Self {
        Arc::make_mut(&mut self.stages).assessor = assessor;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        Arc::make_mut(&mut self.stages).diagnostics = diagnostics;
        self
    }

    pub fn with_min_width(mut self, min_width: u32) -> Self {
        Arc::make_mut(&mut self.stages).min_width = min_width.max(1);
        self
    }

    /// Pool size; zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Validates without a deadline.
    pub async fn validate(&self, candidates: Vec<Candidate>, max_results: usize) -> Vec<Candidate> {
        self.validate_until(candidates, max_results, None).await
    }

    /// Validates `candidates` (already sorted Safe before Unknown) and returns at
    /// most `max_results` accepted ones in completion order.
    ///
    /// When `deadline` passes, dispatch stops and in-flight workers are rejected;
    /// whatever was accepted before then is returned.
    #[instrument(skip_all, fields(candidates = candidates.len(), max_results = max_results, workers = self.workers))]
    pub async fn validate_until(
        &self,
        candidates: Vec<Candidate>,
        max_results: usize,
        deadline: Option<Instant>,
    ) -> Vec<Candidate> {
        if max_results == 0 || candidates.is_empty() {
            return Vec::new();
        }

        let results = Arc::new(ResultSet::new(max_results));
        let dedup = Arc::new(DedupFilter::new());
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();
        let mut dispatched = 0usize;

        for candidate in candidates {
            if candidate.license == ImageLicense::Blocked {
                debug!(url = %candidate.image_url, "Blocked candidate skipped before dispatch");
                continue;
            }

            let permit = match deadline {
                Some(at) => match tokio::time::timeout_at(at, permits.clone().acquire_owned()).await
                {
                    Ok(permit) => permit,
                    Err(_) => {
                        debug!("Deadline reached while waiting for a worker");
                        break;
                    }
                },
                None => permits.clone().acquire_owned().await,
            };
            let Ok(permit) = permit else {
                break;
            };

            if results.is_full() {
                debug!(accepted = results.len(), "Quota reached, stopping dispatch");
                break;
            }

            let stages = Arc::clone(&self.stages);
            let results = Arc::clone(&results);
            let dedup = Arc::clone(&dedup);
            tasks.spawn(async move {
                let _permit = permit;
                stages.run_isolated(candidate, &dedup, &results, deadline).await;
            });
            dispatched += 1;
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                let err = PipelineError::WorkerCancelled {
                    message: e.to_string(),
                };
                warn!(error = %err, "Validation worker did not finish");
                self.stages.diagnostics.fault(Stage::Queued.as_str(), &err);
            }
        }

        let accepted = results.take();
        info!(
            dispatched,
            accepted = accepted.len(),
            unique_images = dedup.len(),
            "Validation finished"
        );
        accepted
    }
}

impl Stages {
    /// Runs one candidate inside a panic boundary and records the outcome.
    async fn run_isolated(
        &self,
        candidate: Candidate,
        dedup: &DedupFilter,
        results: &ResultSet,
        deadline: Option<Instant>,
    ) {
        let tracker = StageTracker::default();
        let url = candidate.image_url.clone();

        let body = async {
            match deadline {
                Some(at) => tokio::time::timeout_at(at, self.validate_one(&candidate, dedup, &tracker))
                    .await
                    .unwrap_or(Err(Rejection::DeadlineExpired)),
                None => self.validate_one(&candidate, dedup, &tracker).await,
            }
        };

        match AssertUnwindSafe(body).catch_unwind().await {
            Ok(Ok(acceptance)) => {
                tracker.enter(Stage::Accepted);
                if results.try_push(candidate) {
                    debug!(url = %url, via = ?acceptance, "Candidate accepted");
                } else {
                    debug!(url = %url, "Candidate passed but quota already met");
                }
            }
            Ok(Err(rejection)) => {
                debug!(url = %url, stage = %tracker.current(), reason = %rejection, "Candidate rejected");
                tracker.enter(Stage::Rejected);
            }
            Err(payload) => {
                let stage = tracker.current();
                let err = PipelineError::WorkerFault {
                    stage: stage.as_str().to_string(),
                    url,
                    message: panic_message(payload.as_ref()),
                };
                warn!(error = %err, "Validation worker panicked");
                self.diagnostics.fault(stage.as_str(), &err);
            }
        }
    }

    async fn validate_one(
        &self,
        candidate: &Candidate,
        dedup: &DedupFilter,
        tracker: &StageTracker,
    ) -> Result<Acceptance, Rejection> {
        let url = candidate.image_url.as_str();

        tracker.enter(Stage::Probing);
        let width = self.fetcher.probe(url, self.min_width).await?;
        debug!(url = %url, width = ?width, "Probe passed");

        tracker.enter(Stage::Downloading);
        let download = self.download(url).await;
        let decoded = download.as_ref().and_then(|d| decode(url, &d.data));

        tracker.enter(Stage::DedupChecking);
        if let Some(img) = &decoded
            && dedup.is_duplicate(img)
        {
            return Err(Rejection::Duplicate);
        }
        drop(decoded);

        tracker.enter(Stage::AssessingLicense);
        let metadata = match (&self.extractor, &download) {
            (Some(extractor), Some(d)) => extractor.extract(&d.data),
            _ => None,
        };
        let assessment = self.assessor.assess(candidate, metadata.as_ref());

        match assessment.license {
            ImageLicense::Blocked => {
                self.audit_license(url, CLASS_STOCK, &assessment);
                let detail = assessment.deciding_detail().unwrap_or_default().to_string();
                return Err(Rejection::LicenseBlocked(detail));
            }
            ImageLicense::Safe => {
                self.audit_license(url, CLASS_PHOTO, &assessment);
                return Ok(Acceptance::License);
            }
            ImageLicense::Unknown => {}
        }

        tracker.enter(Stage::Classifying);
        let Some(download) = download else {
            debug!(url = %url, "No bytes to classify, accepting");
            return Ok(Acceptance::Unclassified);
        };

        let result = self
            .classifier
            .classify_bytes(url, &download.data, &download.mime_type)
            .await;

        if result.is_rejecting() {
            return Err(Rejection::Classified(result.class));
        }
        if result.is_empty() {
            Ok(Acceptance::Unclassified)
        } else {
            Ok(Acceptance::Classified(result))
        }
    }

    /// Single download shared by dedup, metadata and classification. Failure
    /// degrades to `None`.
    async fn download(&self, url: &str) -> Option<DownloadResult> {
        match self.fetcher.download(url, &self.download).await {
            Ok(d) => Some(d),
            Err(e) => {
                debug!(url = %url, error = %e, "Download failed, continuing without bytes");
                None
            }
        }
    }

    fn audit_license(&self, url: &str, class: &str, assessment: &LicenseAssessment) {
        debug!(
            url = %url,
            license = %assessment.license,
            signals = assessment.signals.len(),
            detail = assessment.deciding_detail().unwrap_or_default(),
            "License decided without classification"
        );
        self.diagnostics.classification(ClassificationEvent::new(
            url,
            class,
            LICENSE_DECISION_CONFIDENCE,
            DecisionSource::LicenseAssessment,
        ));
    }
}

fn decode(url: &str, data: &[u8]) -> Option<DynamicImage> {
    match image::load_from_memory(data) {
        Ok(img) => Some(img),
        Err(e) => {
            debug!(url = %url, error = %e, "Downloaded bytes not decodable, skipping dedup");
            None
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    "non-string panic payload".to_string()
}

impl std::fmt::Debug for CandidateValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateValidator")
            .field("workers", &self.workers)
            .field("min_width", &self.stages.min_width)
            .field("classifier", &self.stages.classifier)
            .field("extractor", &self.stages.extractor.is_some())
            .finish()
    }
}
