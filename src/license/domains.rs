//! Domain-based license classification.
//!
//! Host checks are lowercase substring matches, so `"alamy"` also matches
//! `c8.alamy.com`. Blocked lists are always consulted before safe lists.

use reqwest::Url;

use super::types::ImageLicense;

/// Stock photo sites that enforce copyright.
pub const BLOCKED_DOMAINS: &[&str] = &[
    "shutterstock",
    "gettyimages",
    "istockphoto",
    "adobestock",
    "depositphotos",
    "dreamstime",
    "123rf",
    "alamy",
    "bigstockphoto",
    "stocksy",
    "eyeem",
    "pond5",
    "thinkstockphotos",
    "canstockphoto",
    "masterfile",
    "superstock",
    "agefotostock",
    "colourbox",
    "photodune",
    "yayimages",
    "vectorstock",
    "loriimages",
    "fotobank",
    "freepik",
    // trailing dot keeps "canvas" hosts out
    "canva.",
    "clipartof",
    "featurepics",
    "rfclipart",
];

/// Path segments of stock photo landing pages.
pub const BLOCKED_URL_PATTERNS: &[&str] = &[
    "/stock-photo",
    "/stock-image",
    "/editorial-image",
    "/premium-photo",
];

/// Free / CC / attribution-friendly sources.
pub const SAFE_DOMAINS: &[&str] = &[
    "unsplash",
    "pexels",
    "pixabay",
    "wikimedia",
    "commons.wikimedia",
    "flickr",
    "rawpixel",
    "stocksnap",
    "burst.shopify",
    "kaboompics",
    "picjumbo",
];

/// Classifies an image by its own URL and its source page URL.
///
/// Both are checked because a CDN-hosted image may still come from a stock site.
pub fn check_license(image_url: &str, source_url: &str) -> ImageLicense {
    check_license_with::<&str>(image_url, source_url, &[], &[])
}

/// Like [`check_license`], with caller-supplied extra domain lists.
pub fn check_license_with<S: AsRef<str>>(
    image_url: &str,
    source_url: &str,
    extra_blocked: &[S],
    extra_safe: &[S],
) -> ImageLicense {
    let urls = [image_url, source_url];

    if urls.iter().any(|u| is_blocked_with(u, extra_blocked)) {
        return ImageLicense::Blocked;
    }
    if urls.iter().any(|u| is_safe_with(u, extra_safe)) {
        return ImageLicense::Safe;
    }
    ImageLicense::Unknown
}

fn is_blocked_with<S: AsRef<str>>(raw_url: &str, extra: &[S]) -> bool {
    let Some(parsed) = parse(raw_url) else {
        return false;
    };

    if let Some(host) = parsed.host_str() {
        let host = host.to_lowercase();
        if host_matches(&host, BLOCKED_DOMAINS.iter().copied())
            || host_matches(&host, extra.iter().map(|d| d.as_ref()))
        {
            return true;
        }
    }

    let path = parsed.path().to_lowercase();
    BLOCKED_URL_PATTERNS.iter().any(|p| path.contains(p))
}

fn is_safe_with<S: AsRef<str>>(raw_url: &str, extra: &[S]) -> bool {
    let Some(host) = parse(raw_url).and_then(|u| u.host_str().map(str::to_lowercase)) else {
        return false;
    };
    host_matches(&host, SAFE_DOMAINS.iter().copied())
        || host_matches(&host, extra.iter().map(|d| d.as_ref()))
}

fn host_matches<'a>(host: &str, domains: impl IntoIterator<Item = &'a str>) -> bool {
    domains
        .into_iter()
        .filter(|d| !d.is_empty())
        .any(|d| host.contains(&d.to_lowercase()))
}

fn parse(raw_url: &str) -> Option<Url> {
    if raw_url.is_empty() {
        return None;
    }
    Url::parse(raw_url).ok()
}
