//! Retrying HTTP client shared by the upstream clients
//!
//! Provides a high-level interface for making bounded, retryable GET requests
//! against one upstream base URL.

use reqwest::{Client as ReqwestClient, Response};
use serde::de::DeserializeOwned;
use url::Url;
use crate::http::{execute_with_retry, HttpError, RetryPolicy, TimeoutConfig};
use crate::Result;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Retry policy for failed requests
    pub retry_policy: RetryPolicy,
    /// Per-attempt timeouts
    pub timeouts: TimeoutConfig,
    /// User-Agent header sent upstream
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retry_policy: RetryPolicy::default(),
            timeouts: TimeoutConfig::default(),
            user_agent: format!("pokedex/{}", crate::VERSION),
        }
    }
}

/// HTTP client bound to one upstream
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Underlying reqwest client
    client: ReqwestClient,
    /// Base URL every endpoint is resolved against
    base_url: Url,
    /// Client configuration
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client for an upstream
    pub fn new(base_url: &str, config: HttpClientConfig) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| crate::Error::Configuration {
            message: format!("Invalid base URL '{}': {}", base_url, e),
            source: Some(anyhow::Error::new(e)),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(crate::Error::configuration(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }

        config
            .timeouts
            .validate()
            .map_err(crate::Error::configuration)?;

        let client = ReqwestClient::builder()
            .connect_timeout(config.timeouts.connect_timeout)
            .timeout(config.timeouts.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| crate::Error::Http {
                message: format!("Failed to create HTTP client: {}", e),
                status_code: None,
                source: Some(anyhow::Error::new(e)),
            })?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Create with default configuration
    pub fn with_default_config(base_url: &str) -> Result<Self> {
        Self::new(base_url, HttpClientConfig::default())
    }

    /// Build an endpoint URL by appending path segments to the base URL
    ///
    /// Each segment is percent-encoded, so a segment can never introduce
    /// extra path components or a query string.
    pub fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, HttpError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| HttpError::invalid_url(format!("Base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve a (usually absolute) reference found in an upstream payload
    pub fn resolve(&self, reference: &str) -> std::result::Result<Url, HttpError> {
        if reference.trim().is_empty() {
            return Err(HttpError::invalid_url("Empty resource reference"));
        }
        self.base_url
            .join(reference)
            .map_err(|e| HttpError::invalid_url(format!("Invalid resource reference '{}': {}", reference, e)))
    }

    /// Execute a GET with retry logic, failing on any non-success status
    pub async fn get(&self, url: Url) -> std::result::Result<Response, HttpError> {
        execute_with_retry(
            || {
                let request = self.client.get(url.clone());
                async move {
                    let response = request.send().await.map_err(HttpError::from_request_error)?;

                    tracing::debug!(
                        url = %response.url(),
                        status = response.status().as_u16(),
                        "Upstream response"
                    );

                    if !response.status().is_success() {
                        return Err(HttpError::from_response(response).await);
                    }

                    Ok(response)
                }
            },
            self.config.retry_policy.clone(),
        )
        .await
    }

    /// Execute a GET and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, HttpError> {
        let response = self.get(url).await?;
        let status = response.status();

        let body = response.bytes().await.map_err(HttpError::from_request_error)?;
        serde_json::from_slice(&body).map_err(|e| HttpError::decode(status, e))
    }
}
