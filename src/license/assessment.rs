//! Combines independent license evidence into one transparent verdict.

use crate::candidate::Candidate;
use crate::metadata::ImageMetadata;

use super::domains::check_license_with;
use super::types::{ImageLicense, LicenseAssessment, LicenseSignal, SignalSource};

/// Resolves a candidate's license from domain lists and embedded metadata.
///
/// Pure and deterministic: no I/O, no interior state.
#[derive(Debug, Clone, Default)]
pub struct LicenseAssessor {
    extra_blocked: Vec<String>,
    extra_safe: Vec<String>,
}

impl LicenseAssessor {
    pub fn new(extra_blocked: Vec<String>, extra_safe: Vec<String>) -> Self {
        Self {
            extra_blocked,
            extra_safe,
        }
    }

    pub fn has_extra_domains(&self) -> bool {
        !self.extra_blocked.is_empty() || !self.extra_safe.is_empty()
    }

    /// Assesses `candidate` with whatever metadata was extracted (possibly none).
    ///
    /// Signals are emitted in a fixed order (domain, extra domain, metadata stock,
    /// metadata CC) regardless of which one decides the verdict.
    pub fn assess(&self, candidate: &Candidate, meta: Option<&ImageMetadata>) -> LicenseAssessment {
        let mut signals = Vec::with_capacity(4);

        match candidate.license {
            ImageLicense::Blocked => signals.push(LicenseSignal::new(
                SignalSource::Domain,
                format!(
                    "blocked by search-time domain check: {}",
                    candidate.source_url
                ),
                ImageLicense::Blocked,
            )),
            ImageLicense::Safe => signals.push(LicenseSignal::new(
                SignalSource::Domain,
                format!("safe by search-time domain check: {}", candidate.source_url),
                ImageLicense::Safe,
            )),
            ImageLicense::Unknown => {}
        }

        if self.has_extra_domains() {
            let extended = check_license_with(
                &candidate.image_url,
                &candidate.source_url,
                &self.extra_blocked,
                &self.extra_safe,
            );
            if extended != candidate.license && extended != ImageLicense::Unknown {
                signals.push(LicenseSignal::new(
                    SignalSource::ExtraDomain,
                    format!("reclassified by extended domain check: {extended}"),
                    extended,
                ));
            }
        }

        if let Some(meta) = meta {
            if meta.is_stock() {
                signals.push(LicenseSignal::new(
                    SignalSource::MetadataStock,
                    format!(
                        "stock agency detected in metadata: {}",
                        meta.stock_detail()
                    ),
                    ImageLicense::Blocked,
                ));
            }
            if meta.is_creative_commons() {
                signals.push(LicenseSignal::new(
                    SignalSource::MetadataCc,
                    format!("Creative Commons license in metadata: {}", meta.cc_detail()),
                    ImageLicense::Safe,
                ));
            }
        }

        LicenseAssessment {
            license: resolve(&signals),
            signals,
        }
    }
}

/// Blocked > Safe > Unknown; stops at the first Blocked signal.
pub fn resolve(signals: &[LicenseSignal]) -> ImageLicense {
    let mut verdict = ImageLicense::Unknown;
    for signal in signals {
        match signal.license {
            ImageLicense::Blocked => return ImageLicense::Blocked,
            ImageLicense::Safe => verdict = ImageLicense::Safe,
            ImageLicense::Unknown => {}
        }
    }
    verdict
}
