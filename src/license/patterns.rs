/// URL substrings that mark non-photo images.
pub const LOGO_BANNER_PATTERNS: &[&str] = &[
    "favicon", "logo", "icon", "banner", "sprite", "badge", "button", "widget", "avatar",
];

/// Returns `true` if the URL looks like a logo, icon or banner asset.
pub fn is_logo_or_banner(url: &str) -> bool {
    let lower = url.to_lowercase();
    LOGO_BANNER_PATTERNS.iter().any(|p| lower.contains(p))
}
