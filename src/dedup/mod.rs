//! Perceptual duplicate filter, scoped to one validation run.
//!
//! Fingerprints of accepted images are kept in a single locked list. The compare
//! against every stored fingerprint and the insert happen under the same lock, so
//! two near-identical images validated at the same time cannot both be accepted.

pub mod fingerprint;

#[cfg(test)]
mod tests;

pub use fingerprint::{
    FINGERPRINT_BITS, Fingerprint, FingerprintError, HASH_GRID_HEIGHT, HASH_GRID_WIDTH,
    hamming_distance,
};

use image::DynamicImage;
use parking_lot::Mutex;
use tracing::debug;

use crate::constants::DEDUP_THRESHOLD;

/// Thread-safe store of fingerprints for images judged unique.
#[derive(Debug)]
pub struct DedupFilter {
    threshold: u32,
    fingerprints: Mutex<Vec<Fingerprint>>,
}

impl DedupFilter {
    /// Creates an empty filter with the default threshold.
    pub fn new() -> Self {
        Self::with_threshold(DEDUP_THRESHOLD)
    }

    /// Creates an empty filter. Distances strictly below `threshold` are duplicates.
    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            threshold,
            fingerprints: Mutex::new(Vec::new()),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Returns `true` if `img` matches an earlier unique image; otherwise stores its
    /// fingerprint and returns `false`.
    ///
    /// An image that cannot be fingerprinted is treated as unique and not stored.
    pub fn is_duplicate(&self, img: &DynamicImage) -> bool {
        match Fingerprint::from_image(img) {
            Ok(fp) => self.check_and_insert(fp),
            Err(e) => {
                debug!(error = %e, "Fingerprinting failed, treating image as unique");
                false
            }
        }
    }

    /// Same as [`is_duplicate`](Self::is_duplicate) for a precomputed fingerprint.
    pub fn check_and_insert(&self, fp: Fingerprint) -> bool {
        let mut stored = self.fingerprints.lock();

        if let Some(existing) = stored.iter().find(|h| fp.distance(h) < self.threshold) {
            debug!(
                fingerprint = %fp,
                matched = %existing,
                distance = fp.distance(existing),
                "Perceptual duplicate"
            );
            return true;
        }

        stored.push(fp);
        false
    }

    /// Number of stored (unique) fingerprints.
    pub fn len(&self) -> usize {
        self.fingerprints.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.lock().is_empty()
    }
}

impl Default for DedupFilter {
    fn default() -> Self {
        Self::new()
    }
}
