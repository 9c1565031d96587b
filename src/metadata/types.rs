use serde::{Deserialize, Serialize};

use crate::license::is_cc_license_url;

/// Substrings (lowercase) that fingerprint a stock agency in rights metadata.
pub const STOCK_METADATA_KEYWORDS: &[&str] = &[
    "shutterstock",
    "gettyimages",
    "getty images",
    "istockphoto",
    "istock",
    "alamy",
    "depositphotos",
    "dreamstime",
    "123rf",
    "adobestock",
    "adobe stock",
    "bigstockphoto",
    "stocksy",
    "pond5",
    "masterfile",
    "superstock",
    "agefotostock",
    "age fotostock",
    "colourbox",
    "yayimages",
    "vectorstock",
    "freepik",
    "canstockphoto",
];

/// Rights-related text extracted from an image's EXIF / IPTC / XMP / Dublin Core
/// blocks. Empty strings mean the field was not present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub exif_copyright: String,
    pub exif_artist: String,
    pub iptc_copyright: String,
    pub iptc_credit: String,
    pub iptc_source: String,
    pub iptc_byline: String,
    pub xmp_license: String,
    pub xmp_web_statement: String,
    pub xmp_usage_terms: String,
    pub dc_rights: String,
    pub dc_creator: String,
}

impl ImageMetadata {
    /// Fields scanned for stock agency fingerprints, in detail-priority order.
    fn rights_fields(&self) -> [&str; 8] {
        [
            self.exif_copyright.as_str(),
            self.exif_artist.as_str(),
            self.iptc_copyright.as_str(),
            self.iptc_credit.as_str(),
            self.iptc_source.as_str(),
            self.iptc_byline.as_str(),
            self.dc_rights.as_str(),
            self.dc_creator.as_str(),
        ]
    }

    /// Fields that may carry a license reference, in detail-priority order.
    fn license_fields(&self) -> [&str; 4] {
        [
            self.xmp_license.as_str(),
            self.xmp_web_statement.as_str(),
            self.xmp_usage_terms.as_str(),
            self.dc_rights.as_str(),
        ]
    }

    /// Returns `true` if every field is empty.
    pub fn is_empty(&self) -> bool {
        self.rights_fields().iter().all(|f| f.is_empty())
            && self.license_fields().iter().all(|f| f.is_empty())
    }

    /// Returns `true` if any rights field names a known stock agency.
    pub fn is_stock(&self) -> bool {
        self.rights_fields()
            .iter()
            .any(|f| contains_stock_keyword(f))
    }

    /// Returns `true` if any license field references a Creative Commons license.
    pub fn is_creative_commons(&self) -> bool {
        self.license_fields().iter().any(|f| is_cc_license_url(f))
    }

    /// The first rights field naming a stock agency (falls back to the first
    /// non-empty rights field).
    pub fn stock_detail(&self) -> &str {
        let fields = self.rights_fields();
        fields
            .iter()
            .find(|f| contains_stock_keyword(f))
            .or_else(|| fields.iter().find(|f| !f.is_empty()))
            .copied()
            .unwrap_or("")
    }

    /// The first license field carrying a CC reference (falls back to the first
    /// non-empty license field).
    pub fn cc_detail(&self) -> &str {
        let fields = self.license_fields();
        fields
            .iter()
            .find(|f| is_cc_license_url(f))
            .or_else(|| fields.iter().find(|f| !f.is_empty()))
            .copied()
            .unwrap_or("")
    }
}

fn contains_stock_keyword(field: &str) -> bool {
    if field.is_empty() {
        return false;
    }
    let lower = field.to_lowercase();
    STOCK_METADATA_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Stock check that treats absent metadata as "no evidence".
pub fn is_stock_by_metadata(meta: Option<&ImageMetadata>) -> bool {
    meta.is_some_and(ImageMetadata::is_stock)
}

/// CC check that treats absent metadata as "no evidence".
pub fn is_cc_by_metadata(meta: Option<&ImageMetadata>) -> bool {
    meta.is_some_and(ImageMetadata::is_creative_commons)
}
