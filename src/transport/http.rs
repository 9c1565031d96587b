//! `reqwest`-backed [`ImageFetcher`].
//!
//! Downloads go through an ordered list of clients (the proxied anti-bot client
//! first when configured, then the standard client); the first success wins.
//! Probes use a dedicated client that follows at most three redirects.

use std::io::Cursor;

use async_trait::async_trait;
use image::ImageReader;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, StatusCode, redirect};
use tracing::debug;

use super::error::{FetchError, FetchResult};
use super::types::{
    DownloadOptions, DownloadResult, ImageFetcher, is_image_content_type, strip_mime_params,
};
use crate::config::Config;
use crate::constants::{DEFAULT_USER_AGENT, PROBE_DECODE_LIMIT, PROBE_MAX_REDIRECTS};
use crate::license::is_logo_or_banner;

/// A download client and the name it is logged under.
#[derive(Debug, Clone)]
pub struct NamedClient {
    pub label: String,
    pub client: Client,
}

impl NamedClient {
    pub fn new(label: impl Into<String>, client: Client) -> Self {
        Self {
            label: label.into(),
            client,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    clients: Vec<NamedClient>,
    probe_client: Client,
    defaults: DownloadOptions,
}

impl HttpImageFetcher {
    /// Builds the client chain from `config`.
    pub fn from_config(config: &Config) -> FetchResult<Self> {
        let mut clients = Vec::with_capacity(2);

        if let Some(proxy) = &config.stealth_proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| FetchError::ClientBuild(e.to_string()))?;
            let client = Client::builder()
                .proxy(proxy)
                .build()
                .map_err(|e| FetchError::ClientBuild(e.to_string()))?;
            clients.push(NamedClient::new("stealth", client));
        }

        let standard = Client::builder()
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;
        clients.push(NamedClient::new("standard", standard));

        let defaults = DownloadOptions::default()
            .with_max_bytes(config.max_download_bytes)
            .with_timeout(config.download_timeout)
            .with_user_agent(config.user_agent.clone());

        Self::with_clients(clients, defaults)
    }

    /// Uses `clients` in the given order. Zero fields of `defaults` fall back to
    /// the crate defaults.
    pub fn with_clients(clients: Vec<NamedClient>, defaults: DownloadOptions) -> FetchResult<Self> {
        if clients.is_empty() {
            return Err(FetchError::NoClients);
        }

        let probe_client = Client::builder()
            .redirect(redirect::Policy::limited(PROBE_MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self {
            clients,
            probe_client,
            defaults,
        })
    }

    pub fn client_labels(&self) -> Vec<&str> {
        self.clients.iter().map(|c| c.label.as_str()).collect()
    }

    fn resolve(&self, options: &DownloadOptions) -> DownloadOptions {
        DownloadOptions {
            max_bytes: if options.max_bytes == 0 {
                self.defaults.max_bytes
            } else {
                options.max_bytes
            },
            min_bytes: options.min_bytes,
            timeout: if options.timeout.is_zero() {
                self.defaults.timeout
            } else {
                options.timeout
            },
            user_agent: options
                .user_agent
                .clone()
                .or_else(|| self.defaults.user_agent.clone()),
        }
    }

    async fn fetch_once(
        &self,
        client: &Client,
        url: &str,
        options: &DownloadOptions,
    ) -> FetchResult<DownloadResult> {
        let response = client
            .get(url)
            .header(USER_AGENT, options.effective_user_agent(DEFAULT_USER_AGENT))
            .timeout(options.effective_timeout())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let mime_type = check_image_response(url, &response)?;
        let data = read_capped(response, options.effective_max_bytes())
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        if data.len() < options.min_bytes {
            return Err(FetchError::TooSmall {
                url: url.to_string(),
                len: data.len(),
                min_bytes: options.min_bytes,
            });
        }

        Ok(DownloadResult { data, mime_type })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn probe(&self, url: &str, min_width: u32) -> FetchResult<Option<u32>> {
        if is_logo_or_banner(url) {
            return Err(FetchError::LogoOrBanner {
                url: url.to_string(),
            });
        }

        let user_agent = self.defaults.effective_user_agent(DEFAULT_USER_AGENT);
        let response = self
            .probe_client
            .get(url)
            .header(USER_AGENT, user_agent)
            .timeout(self.defaults.effective_timeout())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        check_image_response(url, &response)?;

        match decode_width(response, PROBE_DECODE_LIMIT).await {
            Some(width) if width < min_width => Err(FetchError::TooNarrow {
                url: url.to_string(),
                width,
                min_width,
            }),
            Some(width) => Ok(Some(width)),
            None => {
                debug!(url = %url, "Dimensions not decodable, passing probe");
                Ok(None)
            }
        }
    }

    async fn download(&self, url: &str, options: &DownloadOptions) -> FetchResult<DownloadResult> {
        let options = self.resolve(options);
        let mut last_err = FetchError::NoClients;

        for named in &self.clients {
            match self.fetch_once(&named.client, url, &options).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    debug!(url = %url, client = %named.label, error = %e, "Download attempt failed");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }
}

/// Accepts only 200 responses with an `image/*` content type and returns the
/// bare MIME type.
fn check_image_response(url: &str, response: &Response) -> FetchResult<String> {
    if response.status() != StatusCode::OK {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !is_image_content_type(content_type) {
        return Err(FetchError::NotImage {
            url: url.to_string(),
            content_type: content_type.to_string(),
        });
    }

    Ok(strip_mime_params(content_type).to_string())
}

async fn read_capped(mut response: Response, cap: usize) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::with_capacity(cap.min(64 * 1024));
    while body.len() < cap {
        let Some(chunk) = response.chunk().await? else {
            break;
        };
        let take = chunk.len().min(cap - body.len());
        body.extend_from_slice(&chunk[..take]);
    }
    Ok(body)
}

/// Reads up to `limit` bytes, stopping as soon as the header yields a width.
/// Read errors end the attempt without failing the probe.
async fn decode_width(mut response: Response, limit: usize) -> Option<u32> {
    let mut buf = Vec::new();
    while buf.len() < limit {
        let chunk = match response.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) | Err(_) => break,
        };
        let take = chunk.len().min(limit - buf.len());
        buf.extend_from_slice(&chunk[..take]);

        if let Some(width) = image_width(&buf) {
            return Some(width);
        }
    }
    None
}

/// Width from the image header, if the format is recognised and the header is complete.
pub fn image_width(data: &[u8]) -> Option<u32> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
        .map(|(width, _)| width)
}
