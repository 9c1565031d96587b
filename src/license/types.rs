use serde::{Deserialize, Serialize};

/// Copyright-risk classification of an image.
///
/// When signals are merged, Blocked wins over Safe and Safe wins over Unknown.
/// When candidates are ordered for validation, Safe comes first (see
/// [`ImageLicense::sort_rank`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageLicense {
    /// Known free / CC source.
    Safe,
    /// No evidence either way.
    #[default]
    Unknown,
    /// Stock agency or otherwise copyrighted.
    Blocked,
}

impl ImageLicense {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageLicense::Safe => "safe",
            ImageLicense::Unknown => "unknown",
            ImageLicense::Blocked => "blocked",
        }
    }

    /// Ordering key for the pre-dispatch sort.
    #[inline]
    pub fn sort_rank(&self) -> u8 {
        match self {
            ImageLicense::Safe => 0,
            ImageLicense::Unknown => 1,
            ImageLicense::Blocked => 2,
        }
    }
}

impl std::fmt::Display for ImageLicense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a [`LicenseSignal`] came from. Declaration order is emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    /// Search-time domain classification.
    Domain,
    /// Re-check with caller-supplied domain lists.
    ExtraDomain,
    /// Stock agency fingerprint in embedded metadata.
    MetadataStock,
    /// Creative Commons reference in embedded metadata.
    MetadataCc,
}

impl SignalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalSource::Domain => "domain",
            SignalSource::ExtraDomain => "extra_domain",
            SignalSource::MetadataStock => "metadata_stock",
            SignalSource::MetadataCc => "metadata_cc",
        }
    }
}

/// One piece of evidence about an image's license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSignal {
    pub source: SignalSource,
    pub detail: String,
    pub license: ImageLicense,
}

impl LicenseSignal {
    pub fn new(source: SignalSource, detail: impl Into<String>, license: ImageLicense) -> Self {
        Self {
            source,
            detail: detail.into(),
            license,
        }
    }
}

/// Final verdict plus the signals that produced it (possibly none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseAssessment {
    pub license: ImageLicense,
    pub signals: Vec<LicenseSignal>,
}

impl LicenseAssessment {
    pub fn is_blocked(&self) -> bool {
        self.license == ImageLicense::Blocked
    }

    pub fn is_safe(&self) -> bool {
        self.license == ImageLicense::Safe
    }

    /// Detail of the first signal agreeing with the final verdict.
    pub fn deciding_detail(&self) -> Option<&str> {
        self.signals
            .iter()
            .find(|s| s.license == self.license)
            .map(|s| s.detail.as_str())
    }
}
