use super::*;
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use std::sync::Arc;

const SIZE: u32 = 256;

/// Brightness ramp, increasing left to right.
fn ramp() -> DynamicImage {
    let img = GrayImage::from_fn(SIZE, SIZE, |x, _| Luma([x as u8]));
    DynamicImage::ImageLuma8(img)
}

/// Same ramp reversed: every neighbour comparison flips.
fn reversed_ramp() -> DynamicImage {
    let img = GrayImage::from_fn(SIZE, SIZE, |x, _| Luma([(SIZE - 1 - x) as u8]));
    DynamicImage::ImageLuma8(img)
}

/// Ramp with a small bright corner mark, roughly watermark sized.
fn watermarked_ramp() -> DynamicImage {
    let img = GrayImage::from_fn(SIZE, SIZE, |x, y| {
        if x >= SIZE - 20 && y >= SIZE - 12 {
            Luma([255])
        } else {
            Luma([x as u8])
        }
    });
    DynamicImage::ImageLuma8(img)
}

/// Coarse vertical stripes of alternating brightness.
fn stripes() -> DynamicImage {
    let img = RgbImage::from_fn(SIZE, SIZE, |x, _| {
        if (x / 28) % 2 == 0 {
            image::Rgb([20, 40, 60])
        } else {
            image::Rgb([230, 210, 190])
        }
    });
    DynamicImage::ImageRgb8(img)
}

#[test]
fn test_fingerprint_is_deterministic() {
    let a = Fingerprint::from_image(&ramp()).unwrap();
    let b = Fingerprint::from_image(&ramp()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.distance(&b), 0);
    assert_eq!(a.as_bytes().len() * 8, FINGERPRINT_BITS);
}

#[test]
fn test_fingerprint_of_reversed_structure_is_opposite() {
    let a = Fingerprint::from_image(&ramp()).unwrap();
    let b = Fingerprint::from_image(&reversed_ramp()).unwrap();
    assert_eq!(a.distance(&b), FINGERPRINT_BITS as u32);
}

#[test]
fn test_fingerprint_empty_image_fails() {
    let img = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
    assert_eq!(
        Fingerprint::from_image(&img),
        Err(FingerprintError::EmptyImage {
            width: 0,
            height: 0
        })
    );
}

#[test]
fn test_fingerprint_display_is_hex() {
    let fp = Fingerprint::from_bytes([0xab, 0, 0, 0, 0, 0, 0, 0x01]);
    assert_eq!(fp.to_string(), "ab00000000000001");
}

#[test]
fn test_hamming_distance() {
    assert_eq!(hamming_distance(&[0b1010], &[0b0101]), 4);
    assert_eq!(hamming_distance(&[0xff, 0x00], &[0xff, 0x00]), 0);
    assert_eq!(hamming_distance(&[0x00], &[0x00, 0x00]), u32::MAX);
}

#[test]
fn test_identical_image_is_duplicate() {
    let filter = DedupFilter::new();

    assert!(!filter.is_duplicate(&ramp()));
    assert!(filter.is_duplicate(&ramp()));
    assert_eq!(filter.len(), 1);
}

#[test]
fn test_watermark_noise_is_duplicate() {
    let filter = DedupFilter::new();

    assert!(!filter.is_duplicate(&ramp()));
    assert!(filter.is_duplicate(&watermarked_ramp()));
}

#[test]
fn test_unrelated_images_are_unique() {
    let filter = DedupFilter::new();

    assert!(!filter.is_duplicate(&ramp()));
    assert!(!filter.is_duplicate(&reversed_ramp()));
    assert!(!filter.is_duplicate(&stripes()));
    assert_eq!(filter.len(), 3);
}

#[test]
fn test_unhashable_image_is_unique_and_not_stored() {
    let filter = DedupFilter::new();
    let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 0));

    assert!(!filter.is_duplicate(&empty));
    assert!(!filter.is_duplicate(&empty));
    assert!(filter.is_empty());
}

#[test]
fn test_threshold_is_exclusive() {
    let filter = DedupFilter::with_threshold(2);
    let base = Fingerprint::from_bytes([0; 8]);
    let one_off = Fingerprint::from_bytes([0b1, 0, 0, 0, 0, 0, 0, 0]);
    let two_off = Fingerprint::from_bytes([0b11, 0, 0, 0, 0, 0, 0, 0]);

    assert!(!filter.check_and_insert(base));
    assert!(filter.check_and_insert(one_off));
    assert!(!filter.check_and_insert(two_off));
}

#[test]
fn test_concurrent_identical_images_accept_exactly_one() {
    let filter = Arc::new(DedupFilter::new());
    let img = Arc::new(ramp());

    let uniques: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let filter = Arc::clone(&filter);
                let img = Arc::clone(&img);
                scope.spawn(move || !filter.is_duplicate(&img))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum()
    });

    assert_eq!(uniques, 1);
    assert_eq!(filter.len(), 1);
}
