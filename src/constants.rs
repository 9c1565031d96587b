//! Cross-cutting, shared constants.
//!
//! Values that more than one module needs to agree on live here; module-local tuning
//! knobs stay next to the code that uses them.

use std::time::Duration;

/// Minimum pixel width an image must have to be accepted.
pub const DEFAULT_MIN_IMAGE_WIDTH: u32 = 880;

/// Number of candidates validated concurrently, independent of input size.
pub const DEFAULT_VALIDATION_WORKERS: usize = 3;

/// Maximum Hamming distance (exclusive) at which two fingerprints count as duplicates.
pub const DEDUP_THRESHOLD: u32 = 10;

/// Default body cap for image downloads (also the vision preview size).
pub const DEFAULT_MAX_DOWNLOAD_BYTES: usize = 200 * 1024;

/// Default per-request timeout for probes and downloads.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Default deadline for one search invocation (provider query + validation).
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Bytes read from a probe response when decoding image dimensions.
pub const PROBE_DECODE_LIMIT: usize = 256 * 1024;

/// Redirects followed by the probe request.
pub const PROBE_MAX_REDIRECTS: usize = 3;

/// Cap on the search provider's JSON response body.
pub const SEARCH_BODY_LIMIT: usize = 1024 * 1024;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; photocurate/0.1)";

/// Cache key prefix for six-class vision results.
pub const VISION_CACHE_PREFIX: &str = "vision_cls_v2";
