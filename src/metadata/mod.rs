//! Rights metadata: stock agency fingerprints and Creative Commons references.
//!
//! Absent metadata means "no evidence", never "clean": every check takes an
//! `Option<&ImageMetadata>` and returns `false` for `None`.

pub mod extractor;
pub mod types;


pub use extractor::{MetadataExtractor, XmpPacketExtractor};
pub use types::{
    ImageMetadata, STOCK_METADATA_KEYWORDS, is_cc_by_metadata, is_stock_by_metadata,
};
