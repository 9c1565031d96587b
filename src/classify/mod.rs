//! Vision classification: response parsing, prompt, result cache and the
//! [`ImageClassifier`] service wrapping an injected [`VisionClassifier`].

pub mod cache;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod parser;
pub mod prefilter;
pub mod prompt;
pub mod service;

#[cfg(test)]
mod tests;

pub use cache::{ClassificationCache, MokaClassificationCache, cache_key};
pub use error::{ClassifyError, ClassifyResult};
pub use parser::{
    CLASS_ILLUSTRATION, CLASS_MAP, CLASS_PHOTO, CLASS_REJECT, CLASS_SCREENSHOT, CLASS_STOCK,
    CLASSIFICATION_CLASSES, ClassificationResult, parse_classification_result,
    parse_legacy_response,
};
pub use prefilter::pre_classify;
pub use prompt::DEFAULT_VISION_PROMPT;
pub use service::{ImageClassifier, ImageInput, VisionClassifier};
