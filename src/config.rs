//! Runtime configuration from environment variables
//!
//! | Variable             | Default                   |
//! |----------------------|---------------------------|
//! | `BASE_URL`           | `http://localhost:8000/`  |
//! | `ZEN_WORDS_URL`      | `json/zen_words.json`     |
//! | `SEKKI_DATA_URL`     | `json/sekki_data.json`    |
//! | `PORT`               | `3000`                    |
//! | `FETCH_MAX_ATTEMPTS` | `10`                      |
//! | `FETCH_TIMEOUT_MS`   | `30000`                   |
//! | `FETCH_COOLDOWN_MS`  | `60000`                   |
//!
//! Resource URLs may be relative; they are joined onto `BASE_URL`.

use reqwest::Url;
use std::time::Duration;

use crate::error::ZenError;
use crate::loader::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";
pub const DEFAULT_ZEN_WORDS_URL: &str = "json/zen_words.json";
pub const DEFAULT_SEKKI_DATA_URL: &str = "json/sekki_data.json";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// Absolute once built through `Default` or `from_lookup`
    pub zen_words_url: String,
    pub sekki_data_url: String,
    pub port: u16,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            zen_words_url: resolve_url(DEFAULT_BASE_URL, DEFAULT_ZEN_WORDS_URL),
            sekki_data_url: resolve_url(DEFAULT_BASE_URL, DEFAULT_SEKKI_DATA_URL),
            port: DEFAULT_PORT,
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the process env)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = lookup("BASE_URL").unwrap_or(defaults.base_url);
        let zen_words_url = resolve_url(
            &base_url,
            &lookup("ZEN_WORDS_URL").unwrap_or_else(|| DEFAULT_ZEN_WORDS_URL.to_string()),
        );
        let sekki_data_url = resolve_url(
            &base_url,
            &lookup("SEKKI_DATA_URL").unwrap_or_else(|| DEFAULT_SEKKI_DATA_URL.to_string()),
        );
        let port = parse_or(&lookup, "PORT", defaults.port);

        let max_attempts = parse_or(&lookup, "FETCH_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS).max(1);
        let timeout_ms = parse_or(
            &lookup,
            "FETCH_TIMEOUT_MS",
            defaults.retry.attempt_timeout.as_millis() as u64,
        );
        let cooldown_ms = parse_or(
            &lookup,
            "FETCH_COOLDOWN_MS",
            defaults.retry.failure_cooldown.as_millis() as u64,
        );

        Self {
            base_url,
            zen_words_url,
            sekki_data_url,
            port,
            retry: RetryPolicy {
                max_attempts,
                attempt_timeout: Duration::from_millis(timeout_ms),
                failure_cooldown: Duration::from_millis(cooldown_ms),
                ..defaults.retry
            },
        }
    }

    /// Both resource URLs must be absolute http(s) URLs, otherwise no fetch can succeed
    pub fn validate(&self) -> Result<(), ZenError> {
        for (key, url) in [
            ("ZEN_WORDS_URL", &self.zen_words_url),
            ("SEKKI_DATA_URL", &self.sekki_data_url),
        ] {
            match Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => {
                    return Err(ZenError::InvalidConfig(format!(
                        "{key}={url:?} has unsupported scheme {:?}",
                        parsed.scheme()
                    )))
                }
                Err(e) => {
                    return Err(ZenError::InvalidConfig(format!(
                        "{key}={url:?} is not an absolute URL ({e}); set BASE_URL or use a full URL"
                    )))
                }
            }
        }
        Ok(())
    }
}

/// Join `url` onto `base`; absolute `url`s pass through unchanged.
///
/// An unparsable base leaves `url` as given, so `validate` reports it.
fn resolve_url(base: &str, url: &str) -> String {
    match Url::parse(base).and_then(|base| base.join(url)) {
        Ok(joined) => joined.to_string(),
        Err(e) => {
            tracing::warn!("Cannot resolve {:?} against BASE_URL {:?}: {}", url, base, e);
            url.to_string()
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
                default
            }
        },
        None => default,
    }
}
