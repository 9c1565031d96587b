use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use tracing::debug;

use super::error::{SearchError, SearchResult};
use super::types::{RawSearchResult, SearchOptions, SearxngResponse};
use crate::constants::SEARCH_BODY_LIMIT;

/// Image search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn search(&self, query: &str, options: &SearchOptions)
    -> SearchResult<Vec<RawSearchResult>>;
}

/// SearXNG JSON API (`/search?format=json&categories=images`).
#[derive(Debug, Clone)]
pub struct SearxngProvider {
    base_url: String,
    client: Client,
}

impl SearxngProvider {
    pub fn new(base_url: impl Into<String>) -> SearchResult<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> SearchResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| SearchError::InvalidEndpoint {
            value: base_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `query` with `options` applied.
    pub fn search_url(&self, query: &str, options: &SearchOptions) -> SearchResult<Url> {
        let endpoint = format!("{}/search", self.base_url);
        let mut url = Url::parse(&endpoint).map_err(|e| SearchError::InvalidEndpoint {
            value: endpoint.clone(),
            reason: e.to_string(),
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("format", "json")
                .append_pair("categories", "images");
            if let Some(page) = options.explicit_page() {
                pairs.append_pair("pageno", &page.to_string());
            }
            if let Some(engines) = options.engine_list() {
                pairs.append_pair("engines", &engines);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl SearchProvider for SearxngProvider {
    fn name(&self) -> &str {
        "searxng"
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> SearchResult<Vec<RawSearchResult>> {
        let url = self.search_url(query, options)?;

        let mut response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(options.effective_timeout())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status {
                status: response.status().as_u16(),
            });
        }

        let mut body = Vec::new();
        while body.len() < SEARCH_BODY_LIMIT {
            let Some(chunk) = response.chunk().await? else {
                break;
            };
            let take = chunk.len().min(SEARCH_BODY_LIMIT - body.len());
            body.extend_from_slice(&chunk[..take]);
        }

        let parsed: SearxngResponse = serde_json::from_slice(&body)?;
        debug!(query = %query, results = parsed.results.len(), "SearXNG answered");
        Ok(parsed.results)
    }
}
