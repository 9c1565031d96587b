use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::FetchResult;
use crate::constants::{DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_MAX_DOWNLOAD_BYTES};

/// Download limits. Zero values (and `None`) mean "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Body cap; longer bodies are truncated. Default 200 KiB.
    pub max_bytes: usize,
    /// Bodies shorter than this are rejected. Default 0.
    pub min_bytes: usize,
    /// Per-request timeout. Default 10s.
    pub timeout: Duration,
    /// Overrides the fetcher's user agent.
    pub user_agent: Option<String>,
}

impl DownloadOptions {
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_min_bytes(mut self, min_bytes: usize) -> Self {
        self.min_bytes = min_bytes;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn effective_max_bytes(&self) -> usize {
        if self.max_bytes == 0 {
            DEFAULT_MAX_DOWNLOAD_BYTES
        } else {
            self.max_bytes
        }
    }

    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_DOWNLOAD_TIMEOUT
        } else {
            self.timeout
        }
    }

    pub fn effective_user_agent<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.user_agent.as_deref() {
            Some(ua) if !ua.trim().is_empty() => ua,
            _ => fallback,
        }
    }
}

/// Downloaded image body and its declared MIME type (parameters stripped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Image transport used by the validator and the classifier.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Cheap reachability check. `Ok(Some(width))` when the dimensions could be
    /// decoded, `Ok(None)` when they could not (still a pass).
    async fn probe(&self, url: &str, min_width: u32) -> FetchResult<Option<u32>>;

    /// Fetches the size-capped body.
    async fn download(&self, url: &str, options: &DownloadOptions) -> FetchResult<DownloadResult>;
}

/// `data:<mime>;base64,<payload>` for inline model input.
pub fn encode_data_url(data: &[u8], mime_type: &str) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(data))
}

/// Drops MIME parameters: `image/jpeg; charset=utf-8` becomes `image/jpeg`.
pub fn strip_mime_params(content_type: &str) -> &str {
    content_type
        .split_once(';')
        .map_or(content_type, |(mime, _)| mime)
        .trim()
}

/// True for `image/*` content types, ignoring case and parameters.
pub fn is_image_content_type(content_type: &str) -> bool {
    strip_mime_params(content_type)
        .to_ascii_lowercase()
        .starts_with("image/")
}
