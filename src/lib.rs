//! Photocurate library crate (used by the CLI and integration tests).
//!
//! Turns raw image search hits into a short list of editorial photos: stock and
//! copyrighted content is rejected, visual duplicates are dropped and the rest is
//! checked by a vision model where the license is unclear.
//!
//! # Public API Surface
//!
//! ## Entry point
//! - [`ImageCurator`], [`CuratorBuilder`] - search + validation in one call
//! - [`Config`], [`ConfigError`] - environment-backed settings
//!
//! ## Validation pipeline
//! - [`CandidateValidator`] - bounded-concurrency orchestrator
//! - [`LicenseAssessor`], [`resolve`] - license signal resolution
//! - [`DedupFilter`] - perceptual duplicate filter
//! - [`parse_classification_result`] - vision response parser
//!
//! ## Collaborator seams
//! - [`SearchProvider`], [`ImageFetcher`], [`VisionClassifier`],
//!   [`ClassificationCache`], [`MetadataExtractor`]
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod candidate;
pub mod classify;
pub mod config;
pub mod constants;
pub mod curator;
pub mod dedup;
pub mod events;
pub mod license;
pub mod metadata;
pub mod pipeline;
pub mod search;
pub mod transport;

pub use candidate::{Candidate, sort_by_license};
pub use classify::{
    CLASS_ILLUSTRATION, CLASS_MAP, CLASS_PHOTO, CLASS_REJECT, CLASS_SCREENSHOT, CLASS_STOCK,
    ClassificationCache, ClassificationResult, ClassifyError, DEFAULT_VISION_PROMPT,
    ImageClassifier, ImageInput, MokaClassificationCache, VisionClassifier,
    parse_classification_result, parse_legacy_response, pre_classify,
};
#[cfg(any(test, feature = "mock"))]
pub use classify::mock::MockVisionClassifier;
pub use config::{Config, ConfigError};
pub use curator::{CuratorBuilder, CuratorError, ImageCurator};
pub use dedup::{DedupFilter, Fingerprint, hamming_distance};
pub use events::{ClassificationEvent, DecisionSource, Diagnostics};
pub use license::{
    ImageLicense, LicenseAssessment, LicenseAssessor, LicenseSignal, SignalSource,
    check_license, check_license_with, extract_cc_license, is_cc_license_url, is_logo_or_banner,
    resolve,
};
pub use metadata::{ImageMetadata, MetadataExtractor, XmpPacketExtractor};
pub use pipeline::{Acceptance, CandidateValidator, PipelineError, Rejection, Stage};
#[cfg(any(test, feature = "mock"))]
pub use search::MockSearchProvider;
pub use search::{
    RawSearchResult, SearchError, SearchOptions, SearchProvider, SearxngProvider,
    build_image_query,
};
#[cfg(any(test, feature = "mock"))]
pub use transport::mock::{MockImage, MockImageFetcher};
pub use transport::{DownloadOptions, DownloadResult, FetchError, HttpImageFetcher, ImageFetcher};
