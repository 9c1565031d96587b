//! License screening: domain lists, logo patterns, Creative Commons detection and
//! the signal resolver that merges them.
//!
//! # Precedence vs. ordering
//!
//! [`ImageLicense`] has two different orders. When merging evidence, Blocked beats
//! Safe beats Unknown ([`resolve`]). When ordering candidates for validation, Safe
//! sorts before Unknown ([`ImageLicense::sort_rank`]); Blocked candidates never
//! reach that sort.

pub mod assessment;
pub mod cc;
pub mod domains;
pub mod patterns;
pub mod types;


pub use assessment::{LicenseAssessor, resolve};
pub use cc::{CC_LICENSE_PATH_SEGMENTS, extract_cc_license, is_cc_license_url};
pub use domains::{
    BLOCKED_DOMAINS, BLOCKED_URL_PATTERNS, SAFE_DOMAINS, check_license, check_license_with,
};
pub use patterns::{LOGO_BANNER_PATTERNS, is_logo_or_banner};
pub use types::{ImageLicense, LicenseAssessment, LicenseSignal, SignalSource};
