//! HTTP error classification and normalization
//!
//! Normalizes upstream error responses into a uniform error format

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Classification of HTTP errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClassification {
    /// 404 - the resource does not exist, never retried
    NotFound,
    /// Other client errors (4xx) - should not retry
    ClientError,
    /// Rate limiting - not retried, the upstream windows are far longer than our delays
    RateLimitError,
    /// Server errors (5xx) and 408 - should retry
    ServerError,
    /// Connection failures and timeouts - should retry
    NetworkError,
    /// Body could not be decoded - should not retry
    DecodeError,
    /// Unknown errors - default to no retry
    Unknown,
}

impl ErrorClassification {
    /// Check if this error type should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorClassification::ServerError | ErrorClassification::NetworkError
        )
    }
}

/// Normalized HTTP error representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpError {
    /// HTTP status code if available
    pub status_code: Option<u16>,
    /// Error classification for retry logic
    pub classification: ErrorClassification,
    /// Upstream-specific error code
    pub upstream_code: Option<String>,
    /// Human-readable error message
    pub message: String,
    /// Parsed response body, if it was JSON
    pub details: Option<Value>,
}

impl HttpError {
    /// Create from a non-success reqwest Response
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();

        let body = response.text().await.unwrap_or_default();
        let details = serde_json::from_str::<Value>(&body).ok();

        let (upstream_code, message) = Self::extract_upstream_error(&details, &body, status);

        Self {
            status_code: Some(status.as_u16()),
            classification: Self::classify_status(status),
            upstream_code,
            message,
            details,
        }
    }

    /// Create from a network/request error
    pub fn from_request_error(error: reqwest::Error) -> Self {
        let classification = if error.is_timeout() || error.is_connect() || error.is_request() {
            ErrorClassification::NetworkError
        } else if error.is_decode() || error.is_body() {
            ErrorClassification::DecodeError
        } else {
            ErrorClassification::Unknown
        };

        Self {
            status_code: error.status().map(|s| s.as_u16()),
            classification,
            upstream_code: None,
            message: error.to_string(),
            details: None,
        }
    }

    /// Create from a body that does not match the expected shape
    pub fn decode(status: StatusCode, error: serde_json::Error) -> Self {
        Self {
            status_code: Some(status.as_u16()),
            classification: ErrorClassification::DecodeError,
            upstream_code: None,
            message: format!("Failed to parse response body: {}", error),
            details: None,
        }
    }

    /// Create for a URL that could not be built
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            classification: ErrorClassification::ClientError,
            upstream_code: None,
            message: message.into(),
            details: None,
        }
    }

    /// Classify HTTP status code
    fn classify_status(status: StatusCode) -> ErrorClassification {
        match status.as_u16() {
            404 => ErrorClassification::NotFound,
            408 => ErrorClassification::ServerError,
            429 => ErrorClassification::RateLimitError,
            400..=499 => ErrorClassification::ClientError,
            500..=599 => ErrorClassification::ServerError,
            _ => ErrorClassification::Unknown,
        }
    }

    /// Extract upstream-specific error information
    fn extract_upstream_error(
        details: &Option<Value>,
        body: &str,
        status: StatusCode,
    ) -> (Option<String>, String) {
        let fallback = || {
            if body.is_empty() {
                status.canonical_reason().unwrap_or("no response body").to_string()
            } else {
                body.to_string()
            }
        };

        if let Some(json) = details {
            // FunTranslations: {"error": {"code": 429, "message": "..."}}
            if let Some(error) = json.get("error") {
                let code = error.get("code").and_then(|c| match c {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                });
                let message = error
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(fallback);
                return (code, message);
            }

            // PokeAPI and generic {"detail": "..."} / {"message": "..."}
            if let Some(message) = json
                .get("detail")
                .or_else(|| json.get("message"))
                .and_then(|m| m.as_str())
            {
                return (None, message.to_string());
            }
        }

        (None, fallback())
    }

    /// Check if this error should trigger a retry
    pub fn should_retry(&self) -> bool {
        self.classification.is_retryable()
    }

    /// Whether the upstream reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.classification == ErrorClassification::NotFound
    }

    /// Get the error classification
    pub fn classification(&self) -> ErrorClassification {
        self.classification
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP Error [{}]: {} (classification: {:?})",
            self.status_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            self.message,
            self.classification
        )
    }
}

impl std::error::Error for HttpError {}
