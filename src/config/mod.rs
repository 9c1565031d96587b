//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `PHOTOCURATE_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_MAX_DOWNLOAD_BYTES, DEFAULT_MIN_IMAGE_WIDTH,
    DEFAULT_SEARCH_TIMEOUT, DEFAULT_USER_AGENT, DEFAULT_VALIDATION_WORKERS,
};

/// Curator configuration.
///
/// Use [`Config::from_env`] to read `PHOTOCURATE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// SearXNG base URL. Required unless search providers are injected directly.
    pub searxng_url: Option<String>,

    /// Minimum accepted image width in pixels. Default: `880`.
    pub min_image_width: u32,

    /// User agent sent with probes and downloads.
    pub user_agent: String,

    /// Additional stock domains to block (host substring match).
    pub extra_blocked_domains: Vec<String>,

    /// Additional free/CC domains to treat as safe (host substring match).
    pub extra_safe_domains: Vec<String>,

    /// Overrides the default six-class vision prompt.
    pub vision_prompt: Option<String>,

    /// Proxy for the anti-bot download client, tried before the standard client.
    pub stealth_proxy: Option<String>,

    /// Deadline for one search invocation. Default: 15s.
    pub search_timeout: Duration,

    /// Per-request timeout for probes and downloads. Default: 10s.
    pub download_timeout: Duration,

    /// Body cap for downloads. Default: 200 KiB.
    pub max_download_bytes: usize,

    /// Concurrent validation workers. Default: `3`.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            searxng_url: None,
            min_image_width: DEFAULT_MIN_IMAGE_WIDTH,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_blocked_domains: Vec::new(),
            extra_safe_domains: Vec::new(),
            vision_prompt: None,
            stealth_proxy: None,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
            workers: DEFAULT_VALIDATION_WORKERS,
        }
    }
}

impl Config {
    const ENV_SEARXNG_URL: &'static str = "PHOTOCURATE_SEARXNG_URL";
    const ENV_MIN_IMAGE_WIDTH: &'static str = "PHOTOCURATE_MIN_IMAGE_WIDTH";
    const ENV_USER_AGENT: &'static str = "PHOTOCURATE_USER_AGENT";
    const ENV_EXTRA_BLOCKED: &'static str = "PHOTOCURATE_EXTRA_BLOCKED_DOMAINS";
    const ENV_EXTRA_SAFE: &'static str = "PHOTOCURATE_EXTRA_SAFE_DOMAINS";
    const ENV_VISION_PROMPT: &'static str = "PHOTOCURATE_VISION_PROMPT";
    const ENV_STEALTH_PROXY: &'static str = "PHOTOCURATE_STEALTH_PROXY";
    const ENV_SEARCH_TIMEOUT: &'static str = "PHOTOCURATE_SEARCH_TIMEOUT_SECS";
    const ENV_DOWNLOAD_TIMEOUT: &'static str = "PHOTOCURATE_DOWNLOAD_TIMEOUT_SECS";
    const ENV_WORKERS: &'static str = "PHOTOCURATE_WORKERS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let searxng_url = Self::parse_optional_string_from_env(Self::ENV_SEARXNG_URL);
        let min_image_width =
            Self::parse_number_from_env(Self::ENV_MIN_IMAGE_WIDTH, defaults.min_image_width)?;
        let user_agent = Self::parse_optional_string_from_env(Self::ENV_USER_AGENT)
            .unwrap_or(defaults.user_agent);
        let extra_blocked_domains = Self::parse_list_from_env(Self::ENV_EXTRA_BLOCKED);
        let extra_safe_domains = Self::parse_list_from_env(Self::ENV_EXTRA_SAFE);
        let vision_prompt = Self::parse_optional_string_from_env(Self::ENV_VISION_PROMPT);
        let stealth_proxy = Self::parse_optional_string_from_env(Self::ENV_STEALTH_PROXY);
        let search_timeout = Self::parse_secs_from_env(
            Self::ENV_SEARCH_TIMEOUT,
            defaults.search_timeout,
        )?;
        let download_timeout = Self::parse_secs_from_env(
            Self::ENV_DOWNLOAD_TIMEOUT,
            defaults.download_timeout,
        )?;
        let workers = Self::parse_number_from_env(Self::ENV_WORKERS, defaults.workers)?;

        Ok(Self {
            searxng_url,
            min_image_width,
            user_agent,
            extra_blocked_domains,
            extra_safe_domains,
            vision_prompt,
            stealth_proxy,
            search_timeout,
            download_timeout,
            max_download_bytes: defaults.max_download_bytes,
            workers,
        })
    }

    /// Validates URLs and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref raw) = self.searxng_url {
            let parsed = reqwest::Url::parse(raw).map_err(|e| ConfigError::InvalidSearchUrl {
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(ConfigError::InvalidSearchUrl {
                    value: raw.clone(),
                    reason: format!("unsupported scheme '{}'", parsed.scheme()),
                });
            }
        }

        if let Some(ref proxy) = self.stealth_proxy {
            reqwest::Proxy::all(proxy.as_str()).map_err(|e| ConfigError::InvalidProxy {
                value: proxy.clone(),
                reason: e.to_string(),
            })?;
        }

        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }

        if self.min_image_width == 0 {
            return Err(ConfigError::ZeroMinWidth);
        }

        Ok(())
    }

    /// Returns a copy with zero-valued fields replaced by their defaults.
    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        let mut config = self.clone();
        if config.min_image_width == 0 {
            config.min_image_width = defaults.min_image_width;
        }
        if config.user_agent.trim().is_empty() {
            config.user_agent = defaults.user_agent;
        }
        if config.search_timeout.is_zero() {
            config.search_timeout = defaults.search_timeout;
        }
        if config.download_timeout.is_zero() {
            config.download_timeout = defaults.download_timeout;
        }
        if config.max_download_bytes == 0 {
            config.max_download_bytes = defaults.max_download_bytes;
        }
        if config.workers == 0 {
            config.workers = defaults.workers;
        }
        config
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_list_from_env(var_name: &str) -> Vec<String> {
        env::var(var_name)
            .map(|v| {
                v.split(',')
                    .map(|d| d.trim().to_lowercase())
                    .filter(|d| !d.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parse_number_from_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr<Err = std::num::ParseIntError>,
    {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::NumberParseError {
                    name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_secs_from_env(name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        match env::var(name) {
            Ok(_) => Self::parse_number_from_env::<u64>(name, 0).map(Duration::from_secs),
            Err(_) => Ok(default),
        }
    }
}
