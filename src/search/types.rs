use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SEARCH_TIMEOUT;

/// Per-call search overrides. Zero values mean "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Result page; 0 and 1 both mean the first page.
    pub page_number: u32,
    /// Engines to query; empty means all.
    pub engines: Vec<String>,
    /// Deadline for the whole call (search plus validation). Default 15s.
    pub timeout: Duration,
}

impl SearchOptions {
    pub fn with_page(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    pub fn with_engines<I, S>(mut self, engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.engines = engines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Page to request explicitly, if any.
    pub fn explicit_page(&self) -> Option<u32> {
        (self.page_number > 1).then_some(self.page_number)
    }

    /// Comma-joined engine list, if any engines were named.
    pub fn engine_list(&self) -> Option<String> {
        let engines: Vec<&str> = self
            .engines
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .collect();
        (!engines.is_empty()).then(|| engines.join(","))
    }

    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_SEARCH_TIMEOUT
        } else {
            self.timeout
        }
    }
}

/// One raw image hit as reported by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSearchResult {
    /// Direct image URL.
    pub img_src: String,
    pub thumbnail_src: String,
    /// Page URL.
    pub url: String,
    pub title: String,
}

impl RawSearchResult {
    pub fn new(img_src: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            img_src: img_src.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearxngResponse {
    #[serde(default)]
    pub results: Vec<RawSearchResult>,
}
