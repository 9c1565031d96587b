use serde::{Deserialize, Serialize};

pub const CLASS_PHOTO: &str = "PHOTO";
pub const CLASS_STOCK: &str = "STOCK";
pub const CLASS_REJECT: &str = "REJECT";
pub const CLASS_SCREENSHOT: &str = "SCREENSHOT";
pub const CLASS_ILLUSTRATION: &str = "ILLUSTRATION";
pub const CLASS_MAP: &str = "MAP";

/// Recognised labels, longest first so no label is shadowed by a shorter prefix.
pub const CLASSIFICATION_CLASSES: [&str; 6] = [
    CLASS_ILLUSTRATION,
    CLASS_SCREENSHOT,
    CLASS_REJECT,
    CLASS_PHOTO,
    CLASS_STOCK,
    CLASS_MAP,
];

/// Typed model answer. An empty class means "no usable signal", which callers
/// treat as acceptance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub class: String,
    /// In `(0, 1]`, or `0.0` when the model gave none or an invalid one.
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn new(class: impl Into<String>, confidence: f64) -> Self {
        Self {
            class: class.into(),
            confidence,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.class.is_empty()
    }

    /// PHOTO or no signal at all.
    pub fn is_real_photo(&self) -> bool {
        self.class.is_empty() || self.class == CLASS_PHOTO
    }

    /// Classes the validator drops outright.
    pub fn is_rejecting(&self) -> bool {
        self.class == CLASS_REJECT || self.class == CLASS_STOCK
    }
}

/// Parses answers of the form `CLASS 0.95`.
///
/// Case and surrounding whitespace are ignored, trailing text after the
/// confidence token is discarded, and a confidence outside `(0, 1]` is dropped
/// while the class is kept.
pub fn parse_classification_result(response: &str) -> ClassificationResult {
    let upper = response.trim().to_uppercase();
    if upper.is_empty() {
        return ClassificationResult::default();
    }

    let Some(class) = CLASSIFICATION_CLASSES
        .iter()
        .find(|label| upper.starts_with(*label))
    else {
        return ClassificationResult::default();
    };

    let confidence = upper[class.len()..]
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|c| *c > 0.0 && *c <= 1.0)
        .unwrap_or(0.0);

    ClassificationResult::new(*class, confidence)
}

/// Three-class parser for prompts that only know PHOTO, STOCK and REJECT.
/// Anything else maps to the empty string.
pub fn parse_legacy_response(response: &str) -> &'static str {
    let upper = response.trim().to_uppercase();
    [CLASS_PHOTO, CLASS_STOCK, CLASS_REJECT]
        .into_iter()
        .find(|label| upper.starts_with(label))
        .unwrap_or("")
}
