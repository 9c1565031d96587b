use super::*;
use serial_test::serial;
use std::env;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_photocurate_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("PHOTOCURATE_SEARXNG_URL");
        env::remove_var("PHOTOCURATE_MIN_IMAGE_WIDTH");
        env::remove_var("PHOTOCURATE_USER_AGENT");
        env::remove_var("PHOTOCURATE_EXTRA_BLOCKED_DOMAINS");
        env::remove_var("PHOTOCURATE_EXTRA_SAFE_DOMAINS");
        env::remove_var("PHOTOCURATE_VISION_PROMPT");
        env::remove_var("PHOTOCURATE_STEALTH_PROXY");
        env::remove_var("PHOTOCURATE_SEARCH_TIMEOUT_SECS");
        env::remove_var("PHOTOCURATE_DOWNLOAD_TIMEOUT_SECS");
        env::remove_var("PHOTOCURATE_WORKERS");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.searxng_url.is_none());
    assert_eq!(config.min_image_width, 880);
    assert_eq!(config.workers, 3);
    assert_eq!(config.search_timeout, Duration::from_secs(15));
    assert_eq!(config.download_timeout, Duration::from_secs(10));
    assert_eq!(config.max_download_bytes, 200 * 1024);
    assert!(config.extra_blocked_domains.is_empty());
    assert!(config.vision_prompt.is_none());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_photocurate_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert!(config.searxng_url.is_none());
    assert_eq!(config.min_image_width, 880);
    assert_eq!(config.workers, 3);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_photocurate_env();

    let config = with_env_vars(
        &[
            ("PHOTOCURATE_SEARXNG_URL", "http://searx.local:8888"),
            ("PHOTOCURATE_MIN_IMAGE_WIDTH", "1200"),
            ("PHOTOCURATE_WORKERS", "5"),
            ("PHOTOCURATE_SEARCH_TIMEOUT_SECS", "30"),
        ],
        Config::from_env,
    )
    .expect("should parse overrides");

    assert_eq!(
        config.searxng_url.as_deref(),
        Some("http://searx.local:8888")
    );
    assert_eq!(config.min_image_width, 1200);
    assert_eq!(config.workers, 5);
    assert_eq!(config.search_timeout, Duration::from_secs(30));
}

#[test]
#[serial]
fn test_from_env_domain_lists_are_trimmed_and_lowercased() {
    clear_photocurate_env();

    let config = with_env_vars(
        &[
            ("PHOTOCURATE_EXTRA_BLOCKED_DOMAINS", " MyStock.example , ,pics-paid "),
            ("PHOTOCURATE_EXTRA_SAFE_DOMAINS", "freepics.org"),
        ],
        Config::from_env,
    )
    .expect("should parse lists");

    assert_eq!(
        config.extra_blocked_domains,
        vec!["mystock.example".to_string(), "pics-paid".to_string()]
    );
    assert_eq!(config.extra_safe_domains, vec!["freepics.org".to_string()]);
}

#[test]
#[serial]
fn test_from_env_invalid_number() {
    clear_photocurate_env();

    let result = with_env_vars(&[("PHOTOCURATE_WORKERS", "many")], Config::from_env);

    assert!(matches!(
        result,
        Err(ConfigError::NumberParseError {
            name: "PHOTOCURATE_WORKERS",
            ..
        })
    ));
}

#[test]
#[serial]
fn test_from_env_blank_url_is_none() {
    clear_photocurate_env();

    let config = with_env_vars(&[("PHOTOCURATE_SEARXNG_URL", "   ")], Config::from_env)
        .expect("blank is treated as unset");

    assert!(config.searxng_url.is_none());
}

#[test]
fn test_validate_accepts_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_search_url() {
    let config = Config {
        searxng_url: Some("not a url".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidSearchUrl { .. })
    ));

    let config = Config {
        searxng_url: Some("ftp://searx.local".to_string()),
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("unsupported scheme"));
}

#[test]
fn test_validate_rejects_zero_workers() {
    let config = Config {
        workers: 0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::ZeroWorkers)));
}

#[test]
fn test_validate_rejects_zero_min_width() {
    let config = Config {
        min_image_width: 0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::ZeroMinWidth)));
}

#[test]
fn test_normalized_fills_zero_values() {
    let config = Config {
        min_image_width: 0,
        user_agent: String::new(),
        search_timeout: Duration::ZERO,
        download_timeout: Duration::ZERO,
        max_download_bytes: 0,
        workers: 0,
        ..Default::default()
    }
    .normalized();

    assert_eq!(config.min_image_width, 880);
    assert!(!config.user_agent.is_empty());
    assert_eq!(config.search_timeout, Duration::from_secs(15));
    assert_eq!(config.download_timeout, Duration::from_secs(10));
    assert_eq!(config.max_download_bytes, 200 * 1024);
    assert_eq!(config.workers, 3);
}

#[test]
fn test_normalized_keeps_explicit_values() {
    let config = Config {
        min_image_width: 640,
        workers: 8,
        ..Default::default()
    }
    .normalized();

    assert_eq!(config.min_image_width, 640);
    assert_eq!(config.workers, 8);
}
