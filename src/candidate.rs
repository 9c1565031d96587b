//! Image search result carried through validation.

use serde::{Deserialize, Serialize};

use crate::license::ImageLicense;

/// One image search result with its provisional license verdict.
///
/// Built by a search provider from a raw hit; the verdict starts as the coarse
/// domain classification and is re-evaluated during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Direct image URL.
    pub image_url: String,
    /// Thumbnail URL (may be empty).
    pub thumbnail_url: String,
    /// Page the image was found on.
    pub source_url: String,
    /// Image or page title.
    pub title: String,
    /// Domain-based license verdict.
    pub license: ImageLicense,
}

impl Candidate {
    pub fn new(image_url: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            thumbnail_url: String::new(),
            source_url: source_url.into(),
            title: String::new(),
            license: ImageLicense::Unknown,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = thumbnail_url.into();
        self
    }

    pub fn with_license(mut self, license: ImageLicense) -> Self {
        self.license = license;
        self
    }
}

/// Stable sort by license rank: Safe first, then Unknown, then Blocked.
///
/// Ties keep their relative input order.
pub fn sort_by_license(candidates: &mut [Candidate]) {
    candidates.sort_by_key(|c| c.license.sort_rank());
}
