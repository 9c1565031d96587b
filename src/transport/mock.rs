use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{FetchError, FetchResult};
use super::types::{DownloadOptions, DownloadResult, ImageFetcher, is_image_content_type};
use crate::license::is_logo_or_banner;

/// Canned behaviour for one URL.
#[derive(Debug, Clone)]
pub struct MockImage {
    pub status: u16,
    pub content_type: String,
    /// Width reported by the probe; `None` means undecodable.
    pub width: Option<u32>,
    /// Body served by `download`; `None` makes the download fail.
    pub data: Option<Vec<u8>>,
    pub delay: Option<Duration>,
    pub panic_on_probe: bool,
}

impl MockImage {
    /// A reachable image served with `mime_type`.
    pub fn image(data: Vec<u8>, mime_type: &str, width: Option<u32>) -> Self {
        Self {
            status: 200,
            content_type: mime_type.to_string(),
            width,
            data: Some(data),
            delay: None,
            panic_on_probe: false,
        }
    }

    /// Passes the probe but the body cannot be downloaded.
    pub fn probe_only(width: Option<u32>) -> Self {
        Self {
            data: None,
            ..Self::image(Vec::new(), "image/jpeg", width)
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::probe_only(None)
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn panicking() -> Self {
        Self {
            panic_on_probe: true,
            ..Self::probe_only(None)
        }
    }
}

/// In-memory fetcher keyed by URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct MockImageFetcher {
    images: Mutex<HashMap<String, MockImage>>,
    probes: Mutex<Vec<String>>,
    downloads: Mutex<Vec<String>>,
}

impl MockImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, url: impl Into<String>, image: MockImage) -> Self {
        self.insert(url, image);
        self
    }

    pub fn insert(&self, url: impl Into<String>, image: MockImage) {
        self.images.lock().insert(url.into(), image);
    }

    /// URLs probed so far, in call order.
    pub fn probed(&self) -> Vec<String> {
        self.probes.lock().clone()
    }

    /// URLs downloaded so far, in call order.
    pub fn downloaded(&self) -> Vec<String> {
        self.downloads.lock().clone()
    }

    pub fn download_count(&self, url: &str) -> usize {
        self.downloads.lock().iter().filter(|u| *u == url).count()
    }

    fn lookup(&self, url: &str) -> Option<MockImage> {
        self.images.lock().get(url).cloned()
    }
}

#[async_trait]
impl ImageFetcher for MockImageFetcher {
    async fn probe(&self, url: &str, min_width: u32) -> FetchResult<Option<u32>> {
        self.probes.lock().push(url.to_string());

        if is_logo_or_banner(url) {
            return Err(FetchError::LogoOrBanner {
                url: url.to_string(),
            });
        }

        let Some(image) = self.lookup(url) else {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            });
        };

        if let Some(delay) = image.delay {
            tokio::time::sleep(delay).await;
        }

        if image.panic_on_probe {
            panic!("mock probe failure for {url}");
        }

        if image.status != 200 {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: image.status,
            });
        }

        if !is_image_content_type(&image.content_type) {
            return Err(FetchError::NotImage {
                url: url.to_string(),
                content_type: image.content_type,
            });
        }

        match image.width {
            Some(width) if width < min_width => Err(FetchError::TooNarrow {
                url: url.to_string(),
                width,
                min_width,
            }),
            width => Ok(width),
        }
    }

    async fn download(&self, url: &str, options: &DownloadOptions) -> FetchResult<DownloadResult> {
        self.downloads.lock().push(url.to_string());

        let image = self.lookup(url);
        let Some((data, content_type)) = image.and_then(|i| i.data.map(|d| (d, i.content_type)))
        else {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            });
        };

        let mut data = data;
        data.truncate(options.effective_max_bytes());

        Ok(DownloadResult {
            data,
            mime_type: content_type,
        })
    }
}
