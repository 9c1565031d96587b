//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    NumberParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// The SearXNG base URL is not an absolute http(s) URL.
    #[error("invalid search endpoint '{value}': {reason}")]
    InvalidSearchUrl { value: String, reason: String },

    /// The stealth proxy URL was rejected by the HTTP client.
    #[error("invalid stealth proxy '{value}': {reason}")]
    InvalidProxy { value: String, reason: String },

    /// The worker pool must have at least one worker.
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    /// A zero minimum width would accept every image.
    #[error("minimum image width must be at least 1 pixel")]
    ZeroMinWidth,
}
