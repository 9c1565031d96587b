use std::sync::LazyLock;

use regex::Regex;

use crate::metadata::extractor::unescape;

/// Path prefixes of Creative Commons licenses and public-domain dedications.
pub const CC_LICENSE_PATH_SEGMENTS: &[&str] = &[
    "creativecommons.org/licenses/",
    "creativecommons.org/publicdomain/",
];

/// Returns `true` if `text` references a Creative Commons license.
///
/// Case-insensitive substring match, so `https:`, `http:` and protocol-relative
/// (`//creativecommons.org/...`) forms all work, as do URLs embedded in free text.
/// The CC homepage without a license path does not count.
pub fn is_cc_license_url(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    CC_LICENSE_PATH_SEGMENTS
        .iter()
        .any(|seg| lower.contains(seg))
}

/// HTML patterns that carry a license URL, most authoritative first: a
/// `rel="license"` link (either attribute order), then any href into the CC
/// license tree, then a meta `content=` value.
static CC_LICENSE_HTML_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?i)rel=["']license["'][^>]*href=["']([^"']+)["']"#,
        r#"(?i)href=["']([^"']+)["'][^>]*rel=["']license["']"#,
        r#"(?i)href=["']((?:https?:)?//creativecommons\.org/(?:licenses|publicdomain)/[^"']+)["']"#,
        r#"(?i)content=["']((?:https?:)?//creativecommons\.org/(?:licenses|publicdomain)/[^"']+)["']"#,
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Finds the Creative Commons license a page declares, if any.
///
/// Only the first match of each pattern is considered; a `rel="license"` link to
/// a non-CC license falls through to the next pattern.
pub fn extract_cc_license(html: &str) -> Option<String> {
    if html.is_empty() {
        return None;
    }
    CC_LICENSE_HTML_PATTERNS.iter().find_map(|re| {
        let url = unescape(re.captures(html)?.get(1)?.as_str());
        is_cc_license_url(&url).then_some(url)
    })
}
