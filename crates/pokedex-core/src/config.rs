//! Upstream configuration
//!
//! Plain serde struct so the server can embed it in its own configuration file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RetryPolicy, TimeoutConfig};
use crate::pokeapi::DEFAULT_POKEAPI_URL;
use crate::translator::DEFAULT_TRANSLATOR_URL;

/// Default locale descriptions are selected for
pub const DEFAULT_LOCALE: &str = "en";

/// Default cap on the translation stage, retries included
pub const DEFAULT_TRANSLATION_TIMEOUT_MS: u64 = 10_000;

/// Settings for both upstream dependencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// PokeAPI base URL
    pub pokeapi_url: String,

    /// FunTranslations base URL
    pub translator_url: String,

    /// Locale tag descriptions are selected for
    pub locale: String,

    /// Retries after the first attempt for transient failures
    pub max_retries: u32,

    /// Fixed delay between retries, in milliseconds
    pub retry_delay_ms: u64,

    /// Use exponential backoff (doubling, with jitter) instead of a fixed delay
    pub exponential_backoff: bool,

    /// Connection timeout per attempt, in milliseconds
    pub connect_timeout_ms: u64,

    /// Total timeout per attempt, in milliseconds
    pub request_timeout_ms: u64,

    /// Cap on the whole translation stage, in milliseconds; on expiry the
    /// untranslated description is served
    pub translation_timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            pokeapi_url: DEFAULT_POKEAPI_URL.to_string(),
            translator_url: DEFAULT_TRANSLATOR_URL.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            max_retries: 3,
            retry_delay_ms: 600,
            exponential_backoff: false,
            connect_timeout_ms: 3_000,
            request_timeout_ms: 10_000,
            translation_timeout_ms: DEFAULT_TRANSLATION_TIMEOUT_MS,
        }
    }
}

impl UpstreamConfig {
    /// Check the configuration before any client is built
    pub fn validate(&self) -> Result<()> {
        if self.locale.trim().is_empty() {
            return Err(Error::configuration("locale cannot be empty"));
        }

        for (field, value) in [
            ("pokeapi_url", &self.pokeapi_url),
            ("translator_url", &self.translator_url),
        ] {
            let url = url::Url::parse(value).map_err(|e| Error::Configuration {
                message: format!("{} '{}' is not a valid URL", field, value),
                source: Some(anyhow::Error::new(e)),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::configuration(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, value
                )));
            }
        }

        if self.translation_timeout_ms == 0 {
            return Err(Error::configuration(
                "translation_timeout_ms must be greater than zero",
            ));
        }

        self.timeouts().validate().map_err(Error::configuration)
    }

    /// Retry policy applied to every outbound call
    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(self.max_retries)
            .with_delay(Duration::from_millis(self.retry_delay_ms));

        if self.exponential_backoff {
            policy.exponential(2.0, true)
        } else {
            policy
        }
    }

    /// Per-attempt timeouts
    pub fn timeouts(&self) -> TimeoutConfig {
        TimeoutConfig::new(
            Duration::from_millis(self.connect_timeout_ms),
            Duration::from_millis(self.request_timeout_ms),
        )
    }

    /// Cap on the translation stage
    pub fn translation_timeout(&self) -> Duration {
        Duration::from_millis(self.translation_timeout_ms)
    }

    /// HTTP client configuration shared by both upstream clients
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            retry_policy: self.retry_policy(),
            timeouts: self.timeouts(),
            ..Default::default()
        }
    }
}
