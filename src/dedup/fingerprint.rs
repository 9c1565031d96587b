use bitvec::prelude::*;
use image::DynamicImage;
use image::imageops::{self, FilterType};
use thiserror::Error;

/// Grid the image is reduced to: one extra column so every row yields `HASH_GRID_HEIGHT`
/// neighbour comparisons.
pub const HASH_GRID_WIDTH: u32 = 9;
pub const HASH_GRID_HEIGHT: u32 = 8;

/// Fingerprint width in bits.
pub const FINGERPRINT_BITS: usize = ((HASH_GRID_WIDTH - 1) * HASH_GRID_HEIGHT) as usize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// 64-bit difference hash of an image's downscaled brightness structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_BITS / 8]);

impl Fingerprint {
    /// Computes the dHash: grayscale, shrink to 9x8, and set one bit per row
    /// neighbour pair where the left pixel is darker than the right.
    pub fn from_image(img: &DynamicImage) -> Result<Self, FingerprintError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(FingerprintError::EmptyImage {
                width: img.width(),
                height: img.height(),
            });
        }

        let gray = imageops::resize(
            &img.to_luma8(),
            HASH_GRID_WIDTH,
            HASH_GRID_HEIGHT,
            FilterType::Triangle,
        );

        let mut bits = BitVec::<u8, Lsb0>::with_capacity(FINGERPRINT_BITS);
        for y in 0..HASH_GRID_HEIGHT {
            for x in 0..HASH_GRID_WIDTH - 1 {
                let left = gray.get_pixel(x, y).0[0];
                let right = gray.get_pixel(x + 1, y).0[0];
                bits.push(left < right);
            }
        }

        let mut bytes = [0u8; FINGERPRINT_BITS / 8];
        bytes.copy_from_slice(&bits.into_vec());
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; FINGERPRINT_BITS / 8]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of differing bits.
    pub fn distance(&self, other: &Fingerprint) -> u32 {
        hamming_distance(&self.0, &other.0)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Counts differing bits; slices of unequal length are maximally distant.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> u32 {
    if a.len() != b.len() {
        return u32::MAX;
    }

    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x ^ y).count_ones())
        .sum()
}
