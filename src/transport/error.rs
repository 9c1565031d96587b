use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("logo or banner URL: {url}")]
    LogoOrBanner { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} is not an image (content type {content_type:?})")]
    NotImage { url: String, content_type: String },

    #[error("{url} is {width}px wide, minimum is {min_width}px")]
    TooNarrow {
        url: String,
        width: u32,
        min_width: u32,
    },

    #[error("{url} body is {len} bytes, minimum is {min_bytes}")]
    TooSmall {
        url: String,
        len: usize,
        min_bytes: usize,
    },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("no HTTP client configured")]
    NoClients,
}

pub type FetchResult<T> = Result<T, FetchError>;
