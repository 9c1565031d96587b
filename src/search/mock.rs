use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{SearchError, SearchResult};
use super::provider::SearchProvider;
use super::types::{RawSearchResult, SearchOptions};

/// In-memory provider returning a fixed result list (or a fixed failure).
#[derive(Debug, Default)]
pub struct MockSearchProvider {
    name: String,
    results: Vec<RawSearchResult>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    queries: Mutex<Vec<(String, SearchOptions)>>,
}

impl MockSearchProvider {
    pub fn new(results: Vec<RawSearchResult>) -> Self {
        Self {
            name: "mock".to_string(),
            results,
            ..Default::default()
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            name: "mock".to_string(),
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<(String, SearchOptions)> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> SearchResult<Vec<RawSearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .push((query.to_string(), options.clone()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(message) => Err(SearchError::Provider(message.clone())),
            None => Ok(self.results.clone()),
        }
    }
}
