use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid search endpoint '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },

    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search provider returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no search provider configured")]
    NoProvider,

    #[error("all {count} search providers failed")]
    AllProvidersFailed { count: usize },

    #[error("provider error: {0}")]
    Provider(String),
}

pub type SearchResult<T> = Result<T, SearchError>;
