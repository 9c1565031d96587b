//! Rights metadata extraction from raw image bytes.
//!
//! The built-in [`XmpPacketExtractor`] reads the textual XMP packet that JPEG, PNG,
//! WebP and TIFF files embed verbatim. Binary EXIF/IPTC decoding is left to other
//! [`MetadataExtractor`] implementations.

use super::types::ImageMetadata;

const XMP_PACKET_START: &[u8] = b"<x:xmpmeta";
const XMP_PACKET_END: &[u8] = b"</x:xmpmeta>";

/// Extracts rights metadata from downloaded image bytes.
pub trait MetadataExtractor: Send + Sync {
    /// Returns `None` when the data carries no usable metadata.
    fn extract(&self, data: &[u8]) -> Option<ImageMetadata>;
}

/// Reads rights properties from an embedded XMP packet.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmpPacketExtractor;

impl XmpPacketExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataExtractor for XmpPacketExtractor {
    fn extract(&self, data: &[u8]) -> Option<ImageMetadata> {
        let packet = find_packet(data)?;
        let xml = String::from_utf8_lossy(packet);

        let read = |name: &str| property(&xml, name).unwrap_or_default();

        let meta = ImageMetadata {
            exif_copyright: String::new(),
            exif_artist: read("tiff:Artist"),
            iptc_copyright: String::new(),
            iptc_credit: read("photoshop:Credit"),
            iptc_source: read("photoshop:Source"),
            iptc_byline: String::new(),
            xmp_license: read("cc:license"),
            xmp_web_statement: read("xmpRights:WebStatement"),
            xmp_usage_terms: read("xmpRights:UsageTerms"),
            dc_rights: read("dc:rights"),
            dc_creator: read("dc:creator"),
        };

        if meta.is_empty() { None } else { Some(meta) }
    }
}

fn find_packet(data: &[u8]) -> Option<&[u8]> {
    let start = find_subslice(data, XMP_PACKET_START)?;
    let rest = &data[start..];
    let end = find_subslice(rest, XMP_PACKET_END)?;
    Some(&rest[..end + XMP_PACKET_END.len()])
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Reads a property in attribute form first, then element form.
fn property(xml: &str, name: &str) -> Option<String> {
    attribute_value(xml, name)
        .or_else(|| element_value(xml, name))
        .map(|v| unescape(&v))
        .filter(|v| !v.is_empty())
}

/// `name="value"` with a whitespace boundary before the name.
fn attribute_value(xml: &str, name: &str) -> Option<String> {
    for (idx, _) in xml.match_indices(name) {
        let preceded_by_space = xml[..idx]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        if !preceded_by_space {
            continue;
        }

        let after = xml[idx + name.len()..].trim_start();
        let Some(after_eq) = after.strip_prefix('=') else {
            continue;
        };
        let after_eq = after_eq.trim_start();
        let Some(quote) = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let body = &after_eq[1..];
        if let Some(close) = body.find(quote) {
            return Some(body[..close].trim().to_string());
        }
    }
    None
}

/// `<name ...>text</name>` (inner tags stripped) or `<name rdf:resource="..."/>`.
fn element_value(xml: &str, name: &str) -> Option<String> {
    let open = format!("<{name}");
    let close = format!("</{name}>");

    for (idx, _) in xml.match_indices(&open) {
        let tail = &xml[idx + open.len()..];
        let boundary_ok = tail
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/');
        if !boundary_ok {
            continue;
        }

        let Some(tag_len) = tail.find('>') else {
            continue;
        };
        let tag = &tail[..tag_len];
        if tag.ends_with('/') {
            if let Some(resource) = attribute_value(tag, "rdf:resource") {
                return Some(resource);
            }
            continue;
        }

        let body = &tail[tag_len + 1..];
        let Some(end) = body.find(&close) else {
            continue;
        };
        let text = strip_tags(&body[..end]);
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

fn strip_tags(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
